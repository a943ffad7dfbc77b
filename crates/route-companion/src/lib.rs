//! `route-companion`: the AI companion behind the chat panel.
//!
//! ```text
//! ChatSession      ← transcript + Idle/AwaitingResponse state, one request in flight
//!     │
//!     ▼
//! CompletionClient ← seam for the outbound call
//!     ├── AnthropicClient  hosted messages API (server proxy, CLI)
//!     └── RouteClient      a running `route serve` instance's /api/chat
//! ```
//!
//! Every request carries a [`ChatContext`](route_core::context::ChatContext)
//! snapshot of the workspace's tasks, projects and clients.

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::{AnthropicClient, CompletionClient, RouteClient};
pub use error::{CompanionError, Result};
pub use session::{ChatSession, Outcome, SessionState, APOLOGY};
pub use types::{ChatReply, ChatRequest, Message, Role};
