use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use route_companion::CompanionError;
use route_core::RouteError;

// ---------------------------------------------------------------------------
// Internal sentinel for upstream gateway failures
// ---------------------------------------------------------------------------

/// Carries an explicit 502 through the `anyhow::Error` chain.
#[derive(Debug)]
struct UpstreamError(String);

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UpstreamError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(RouteError::Validation(msg.into()).into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self(RouteError::not_found(kind, id).into())
    }

    /// The payment gateway or completion service failed.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self(UpstreamError(msg.into()).into())
    }

    pub fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<UpstreamError>().is_some() {
            return StatusCode::BAD_GATEWAY;
        }
        if let Some(e) = self.0.downcast_ref::<RouteError>() {
            return match e {
                RouteError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
                RouteError::NotInitialized
                | RouteError::InvalidSlotKey(_)
                | RouteError::InvalidOrder(_)
                | RouteError::Validation(_)
                | RouteError::UnknownVariant { .. } => StatusCode::BAD_REQUEST,
                RouteError::Storage(_)
                | RouteError::Io(_)
                | RouteError::Yaml(_)
                | RouteError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if let Some(e) = self.0.downcast_ref::<CompanionError>() {
            return match e {
                CompanionError::EmptyMessage => StatusCode::BAD_REQUEST,
                CompanionError::Busy => StatusCode::CONFLICT,
                CompanionError::MissingApiKey(_)
                | CompanionError::Http(_)
                | CompanionError::Upstream { .. }
                | CompanionError::Decode(_) => StatusCode::BAD_GATEWAY,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
