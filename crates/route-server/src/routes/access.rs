use axum::extract::State;
use axum::Json;
use route_core::access::{self, AccessGrant};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CodeBody {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CodeCheck {
    pub grant: AccessGrant,
    pub granted: bool,
}

/// POST /api/access/check
pub async fn check_code(
    State(app): State<AppState>,
    Json(body): Json<CodeBody>,
) -> Result<Json<CodeCheck>, AppError> {
    let grant = access::check(&app.config.access, &body.code)?;
    Ok(Json(CodeCheck {
        grant,
        granted: grant.is_granted(),
    }))
}
