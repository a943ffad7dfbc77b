use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("not initialized: run 'route init'")]
    NotInitialized,

    #[error("invalid slot key '{0}': must be lowercase alphanumeric with '_' or '-'")]
    InvalidSlotKey(String),

    #[error("{kind} not found: {id}")]
    EntityNotFound { kind: &'static str, id: String },

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RouteError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RouteError::EntityNotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        RouteError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
