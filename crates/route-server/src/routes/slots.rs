use axum::extract::{Path, State};
use axum::Json;
use route_core::workspace::{hydrate_slot, SlotView};

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/slots: stored slot keys.
pub async fn list_slots(State(app): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(with_store(&app, |store| store.keys()).await?))
}

/// GET /api/slots/{key}: hydrate and return one slot.
pub async fn get_slot(
    State(app): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SlotView>, AppError> {
    Ok(Json(with_store(&app, move |store| hydrate_slot(store, &key)).await?))
}

/// PUT /api/slots/{key}: overwrite the slot with the body, migrated like a
/// legacy value. Last writer wins.
pub async fn put_slot(
    State(app): State<AppState>,
    Path(key): Path<String>,
    Json(data): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let saved = key.clone();
    with_store(&app, move |store| store.put(&key, data)).await?;
    Ok(Json(serde_json::json!({ "key": saved, "saved": true })))
}

/// DELETE /api/slots/{key}: remove the slot; the next read seeds again.
pub async fn clear_slot(
    State(app): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cleared_key = key.clone();
    let cleared = with_store(&app, move |store| store.clear(&key)).await?;
    Ok(Json(serde_json::json!({ "key": cleared_key, "cleared": cleared })))
}
