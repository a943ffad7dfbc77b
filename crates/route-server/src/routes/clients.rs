use axum::extract::{Path, Query, State};
use axum::Json;
use route_core::entities::client::{self, Client, ClientDraft, ClientPatch, ClientStatus};
use route_core::entity::Entity;
use route_core::query::{derive, parse_filter, SortOrder, ViewQuery};
use route_core::{list, RouteError};
use serde::Deserialize;

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

impl ClientQuery {
    fn view(&self) -> route_core::Result<ViewQuery<ClientStatus>> {
        Ok(ViewQuery {
            search: self.search.clone().unwrap_or_default(),
            filter: parse_filter(self.status.as_deref())?,
            sort: self.sort.as_deref().map(str::parse::<SortOrder>).transpose()?,
        })
    }
}

/// GET /api/clients: derived view over the client list.
pub async fn list_clients(
    State(app): State<AppState>,
    Query(q): Query<ClientQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    let view = q.view()?;
    let clients = with_store(&app, move |store| {
        let all = store.hydrate::<Client>()?.items;
        Ok(derive(&all, &view))
    })
    .await?;
    Ok(Json(clients))
}

/// POST /api/clients
pub async fn create_client(
    State(app): State<AppState>,
    Json(draft): Json<ClientDraft>,
) -> Result<Json<Client>, AppError> {
    let created = draft.into_client()?;
    let record = created.clone();
    with_store(&app, move |store| {
        store.hydrate::<Client>()?;
        store.mutate::<Client, _>(Client::SLOT, |clients| Ok(list::add(clients, record)))
    })
    .await?;
    tracing::info!(client = %created.id, "created client");
    Ok(Json(created))
}

/// PATCH /api/clients/{id}
pub async fn update_client(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ClientPatch>,
) -> Result<Json<Client>, AppError> {
    let updated = with_store(&app, move |store| {
        store.hydrate::<Client>()?;
        let clients = store.mutate::<Client, _>(Client::SLOT, |clients| {
            client::edit_client(clients, &id, patch)
        })?;
        list::find(&clients, &id)
            .cloned()
            .ok_or_else(|| RouteError::not_found(Client::KIND, &id))
    })
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = id.clone();
    with_store(&app, move |store| {
        store.hydrate::<Client>()?;
        store.mutate::<Client, _>(Client::SLOT, |clients| {
            list::find(clients, &id).ok_or_else(|| RouteError::not_found(Client::KIND, &id))?;
            Ok(list::remove(clients, &id))
        })
    })
    .await?;
    Ok(Json(serde_json::json!({ "deleted": removed })))
}
