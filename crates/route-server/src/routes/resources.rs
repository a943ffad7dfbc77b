use axum::extract::{Path, Query, State};
use axum::Json;
use route_core::entities::resource::{self, Resource, ResourceDraft, ResourceType};
use route_core::entity::Entity;
use route_core::query::{derive, parse_filter, SortOrder, ViewQuery};
use route_core::{list, RouteError};
use serde::Deserialize;

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tag: Option<String>,
    pub project: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/resources: search, type filter, tag/project narrowing and sort,
/// with pinned resources always on top.
pub async fn list_resources(
    State(app): State<AppState>,
    Query(q): Query<ResourceQuery>,
) -> Result<Json<Vec<Resource>>, AppError> {
    let view: ViewQuery<ResourceType> = ViewQuery {
        search: q.search.unwrap_or_default(),
        filter: parse_filter(q.kind.as_deref())?,
        sort: q.sort.as_deref().map(str::parse::<SortOrder>).transpose()?,
    };
    let (tag, project) = (q.tag, q.project);
    let resources = with_store(&app, move |store| {
        let all = store.hydrate::<Resource>()?.items;
        let narrowed = resource::narrow(derive(&all, &view), tag.as_deref(), project.as_deref());
        Ok(resource::pinned_first(narrowed))
    })
    .await?;
    Ok(Json(resources))
}

/// POST /api/resources
pub async fn create_resource(
    State(app): State<AppState>,
    Json(draft): Json<ResourceDraft>,
) -> Result<Json<Resource>, AppError> {
    let created = draft.into_resource()?;
    let record = created.clone();
    with_store(&app, move |store| {
        store.hydrate::<Resource>()?;
        store.mutate::<Resource, _>(Resource::SLOT, |items| Ok(list::add(items, record)))
    })
    .await?;
    Ok(Json(created))
}

/// POST /api/resources/{id}/pin: flip the pinned flag.
pub async fn pin_resource(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resource>, AppError> {
    let pinned = with_store(&app, move |store| {
        store.hydrate::<Resource>()?;
        let items =
            store.mutate::<Resource, _>(Resource::SLOT, |items| resource::toggle_pin(items, &id))?;
        list::find(&items, &id)
            .cloned()
            .ok_or_else(|| RouteError::not_found(Resource::KIND, &id))
    })
    .await?;
    Ok(Json(pinned))
}

/// DELETE /api/resources/{id}
pub async fn delete_resource(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = id.clone();
    with_store(&app, move |store| {
        store.hydrate::<Resource>()?;
        store.mutate::<Resource, _>(Resource::SLOT, |items| {
            list::find(items, &id).ok_or_else(|| RouteError::not_found(Resource::KIND, &id))?;
            Ok(list::remove(items, &id))
        })
    })
    .await?;
    Ok(Json(serde_json::json!({ "deleted": removed })))
}
