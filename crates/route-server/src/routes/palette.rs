use axum::extract::{Query, State};
use axum::Json;
use route_core::palette::{self, PaletteItem};
use serde::Deserialize;

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PaletteQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/palette?q=
pub async fn search(
    State(app): State<AppState>,
    Query(query): Query<PaletteQuery>,
) -> Result<Json<Vec<PaletteItem>>, AppError> {
    let items = with_store(&app, move |store| {
        let all = palette::collect(store)?;
        Ok(palette::search(&all, &query.q))
    })
    .await?;
    Ok(Json(items))
}
