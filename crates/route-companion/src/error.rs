use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanionError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is still pending")]
    Busy,

    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CompanionError>;
