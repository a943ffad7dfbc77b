use axum::extract::State;
use axum::Json;
use route_core::billing::{self, CheckoutRequest, CheckoutSession};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
struct GatewaySession {
    url: Option<String>,
}

#[derive(Deserialize)]
struct GatewayError {
    error: GatewayErrorDetail,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    message: String,
}

/// POST /api/create-checkout-session: `{planId, priceId}` → `{url}`.
///
/// Unknown plans are a 400. A missing secret or any gateway failure is a 502.
pub async fn create_checkout_session(
    State(app): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>, AppError> {
    let cfg = &app.config.billing;
    let plan = request.resolve(cfg)?;
    let secret = app.billing_secret.as_deref().ok_or_else(|| {
        AppError::upstream(format!(
            "payment gateway not configured: {} is not set",
            cfg.secret_key_env
        ))
    })?;

    let url = format!("{}/v1/checkout/sessions", cfg.stripe_base.trim_end_matches('/'));
    let resp = app
        .http
        .post(&url)
        .bearer_auth(secret)
        .form(&billing::session_form(cfg, plan))
        .send()
        .await
        .map_err(|e| AppError::upstream(format!("payment gateway unreachable: {e}")))?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| AppError::upstream(format!("payment gateway read failed: {e}")))?;
    if !status.is_success() {
        let message = serde_json::from_str::<GatewayError>(&text)
            .map(|b| b.error.message)
            .unwrap_or(text);
        tracing::warn!(status = status.as_u16(), plan = %plan.id, "checkout session failed");
        return Err(AppError::upstream(format!("payment gateway error: {message}")));
    }

    let url = serde_json::from_str::<GatewaySession>(&text)
        .ok()
        .and_then(|s| s.url)
        .ok_or_else(|| AppError::upstream("payment gateway returned no checkout url"))?;
    tracing::info!(plan = %plan.id, "created checkout session");
    Ok(Json(CheckoutSession { url }))
}
