use std::future::Future;

use route_core::config::CompanionConfig;
use route_core::context::ChatContext;
use serde::{Deserialize, Serialize};

use crate::types::{ChatReply, ChatRequest, Message};
use crate::{CompanionError, Result};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One outbound completion call. No retries; callers own timeouts.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<String>> + Send;
}

// ─── Hosted messages API ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicClient {
    pub fn new(cfg: &CompanionConfig, api_key: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), cfg, api_key)
    }

    pub fn with_http(http: reqwest::Client, cfg: &CompanionConfig, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
        }
    }

    /// Read the key from the env var named by `cfg.api_key_env`.
    pub fn from_env(cfg: &CompanionConfig) -> Result<Self> {
        let key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CompanionError::MissingApiKey(cfg.api_key_env.clone()))?;
        Ok(Self::new(cfg, key))
    }
}

impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = MessagesBody {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: system_prompt(&request.context),
            messages: &request.messages,
        };
        let resp = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), "completion request failed");
            return Err(CompanionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| CompanionError::Decode(e.to_string()))?;
        let text: String = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(CompanionError::Decode("reply had no text".into()));
        }
        Ok(text)
    }
}

/// System prompt with the workspace snapshot embedded as JSON.
pub fn system_prompt(context: &ChatContext) -> String {
    let mut prompt = String::from(
        "You are the Founder's Route companion, a concise, practical assistant for a \
         solo founder. Answer using the founder's own data when it is relevant.",
    );
    if context.is_empty() {
        prompt.push_str("\n\nThe founder has no tasks, projects or clients yet.");
    } else {
        let snapshot = serde_json::to_string_pretty(context).unwrap_or_default();
        prompt.push_str("\n\nCurrent workspace (tasks, projects, clients):\n");
        prompt.push_str(&snapshot);
    }
    prompt
}

// ─── Route server proxy ───────────────────────────────────────────────────

/// Talks to another process's `POST /api/chat`.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

impl RouteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl CompletionClient for RouteClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorReply>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(CompanionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str::<ChatReply>(&text)
            .map(|r| r.text)
            .map_err(|e| CompanionError::Decode(e.to_string()))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
