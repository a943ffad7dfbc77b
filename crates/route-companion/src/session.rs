use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use route_core::config::CompanionConfig;
use route_core::context::ChatContext;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::client::CompletionClient;
use crate::types::{ChatRequest, Message};
use crate::{CompanionError, Result};

/// Appended as the assistant turn when a request fails or times out.
pub const APOLOGY: &str = "Sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// How one `send` ended. The session is back to `Idle` in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answered(String),
    /// The client returned an error; carries its message.
    Failed(String),
    TimedOut,
    /// `cancel()` was called; nothing was appended.
    Cancelled,
}

impl Outcome {
    /// Text shown to the user for this outcome, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Outcome::Answered(text) => Some(text),
            Outcome::Failed(_) | Outcome::TimedOut => Some(APOLOGY),
            Outcome::Cancelled => None,
        }
    }
}

struct Inner {
    state: SessionState,
    transcript: Vec<Message>,
    cancel: Option<oneshot::Sender<()>>,
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns the session to `Idle` when a send finishes or its future is
/// dropped before the reply arrives.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = lock_inner(self.inner);
        inner.state = SessionState::Idle;
        inner.cancel = None;
    }
}

// ─── ChatSession ──────────────────────────────────────────────────────────

/// A chat transcript with at most one request in flight.
///
/// `send` takes `&self` so the session can be shared (`Arc<ChatSession<_>>`)
/// and `cancel` called from another task while a reply is pending.
pub struct ChatSession<C> {
    client: C,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl<C: CompletionClient> ChatSession<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                transcript: Vec::new(),
                cancel: None,
            }),
        }
    }

    pub fn from_config(client: C, cfg: &CompanionConfig) -> Self {
        Self::new(client, Duration::from_secs(cfg.timeout_secs))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.lock().transcript.clone()
    }

    /// Send `text` with `context` and wait for the outcome.
    ///
    /// Blank text fails with [`CompanionError::EmptyMessage`] and a second
    /// send while one is pending fails with [`CompanionError::Busy`]; neither
    /// changes the session. Dropping the returned future leaves the user
    /// message in the transcript and the session `Idle`.
    pub async fn send(&self, text: &str, context: ChatContext) -> Result<Outcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CompanionError::EmptyMessage);
        }

        let (tx, rx) = oneshot::channel();
        let request = {
            let mut inner = self.lock();
            if inner.state == SessionState::AwaitingResponse {
                return Err(CompanionError::Busy);
            }
            inner.transcript.push(Message::user(text));
            inner.state = SessionState::AwaitingResponse;
            inner.cancel = Some(tx);
            ChatRequest {
                messages: inner.transcript.clone(),
                context,
            }
        };
        let _in_flight = InFlight { inner: &self.inner };

        let outcome = tokio::select! {
            result = tokio::time::timeout(self.timeout, self.client.complete(&request)) => match result {
                Ok(Ok(reply)) => Outcome::Answered(reply),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "companion request failed");
                    Outcome::Failed(e.to_string())
                }
                Err(_) => {
                    tracing::warn!(timeout_secs = self.timeout.as_secs(), "companion request timed out");
                    Outcome::TimedOut
                }
            },
            _ = rx => Outcome::Cancelled,
        };

        if let Some(reply) = outcome.reply() {
            self.lock().transcript.push(Message::assistant(reply));
        }
        Ok(outcome)
    }

    /// Abort the pending request. No-op while idle.
    pub fn cancel(&self) {
        if let Some(tx) = self.lock().cancel.take() {
            let _ = tx.send(());
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        if inner.state == SessionState::Idle {
            inner.transcript.clear();
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
