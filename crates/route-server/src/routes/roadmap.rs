use axum::extract::State;
use axum::Json;
use route_core::entities::milestone::{self, Milestone};
use route_core::entity::Entity;
use route_core::list;
use serde::{Deserialize, Serialize};

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuarterGroup {
    pub quarter: String,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Serialize)]
pub struct Roadmap {
    pub milestones: Vec<Milestone>,
    pub quarters: Vec<QuarterGroup>,
}

impl Roadmap {
    fn from_list(milestones: Vec<Milestone>) -> Self {
        let quarters = milestone::by_quarter(&milestones)
            .into_iter()
            .map(|(quarter, group)| QuarterGroup {
                quarter,
                milestones: group.into_iter().cloned().collect(),
            })
            .collect();
        Self {
            milestones,
            quarters,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderBody {
    pub order: Vec<String>,
}

/// GET /api/roadmap
pub async fn list_milestones(State(app): State<AppState>) -> Result<Json<Roadmap>, AppError> {
    let items = with_store(&app, |store| Ok(store.hydrate::<Milestone>()?.items)).await?;
    Ok(Json(Roadmap::from_list(items)))
}

/// PUT /api/roadmap/order: `{"order": [ids...]}` must name every milestone
/// exactly once.
pub async fn reorder_milestones(
    State(app): State<AppState>,
    Json(body): Json<OrderBody>,
) -> Result<Json<Roadmap>, AppError> {
    let items = with_store(&app, move |store| {
        store.hydrate::<Milestone>()?;
        let order: Vec<&str> = body.order.iter().map(String::as_str).collect();
        store.mutate::<Milestone, _>(Milestone::SLOT, |items| list::reorder(items, &order))
    })
    .await?;
    tracing::debug!(count = items.len(), "reordered roadmap");
    Ok(Json(Roadmap::from_list(items)))
}
