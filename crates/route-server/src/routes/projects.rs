use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use route_core::entities::project::{self, Project, ProjectDraft, ProjectStatus};
use route_core::entities::task::{self, Task, TaskDraft, TaskStatus};
use route_core::entity::Entity;
use route_core::{list, RouteError, Store};
use route_core::query::{derive, parse_filter, SortOrder, ViewQuery};
use serde::{Deserialize, Serialize};

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

/// A project's tasks together with its refreshed counters.
#[derive(Debug, Serialize)]
pub struct ProjectTasks {
    pub project: Project,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    status: Option<TaskStatus>,
}

/// GET /api/projects: counters are computed from each project's slots.
pub async fn list_projects(
    State(app): State<AppState>,
    Query(q): Query<ProjectQuery>,
) -> Result<Json<Vec<Project>>, AppError> {
    let view: ViewQuery<ProjectStatus> = ViewQuery {
        search: q.search.unwrap_or_default(),
        filter: parse_filter(q.status.as_deref())?,
        sort: q.sort.as_deref().map(str::parse::<SortOrder>).transpose()?,
    };
    let projects = with_store(&app, move |store| {
        let all = project::load_projects(store)?;
        Ok(derive(&all, &view))
    })
    .await?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create_project(
    State(app): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<Project>, AppError> {
    let created = draft.into_project()?;
    let record = created.clone();
    with_store(&app, move |store| {
        store.hydrate::<Project>()?;
        store.mutate::<Project, _>(Project::SLOT, |items| Ok(list::add(items, record)))
    })
    .await?;
    tracing::info!(project = %created.id, "created project");
    Ok(Json(created))
}

/// DELETE /api/projects/{id}: also clears the project's task, resource and
/// reflection slots.
pub async fn delete_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = id.clone();
    with_store(&app, move |store| {
        store.hydrate::<Project>()?;
        project::delete_project(store, &id)
    })
    .await?;
    tracing::info!(project = %removed, "deleted project");
    Ok(Json(serde_json::json!({ "deleted": removed })))
}

fn with_counters(
    store: &Store,
    project_id: &str,
    tasks: Vec<Task>,
) -> route_core::Result<ProjectTasks> {
    let project = project::load_projects(store)?
        .into_iter()
        .find(|p| p.id == project_id)
        .ok_or_else(|| RouteError::not_found(Project::KIND, project_id))?;
    Ok(ProjectTasks { project, tasks })
}

/// GET /api/projects/{id}/tasks
pub async fn list_tasks(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectTasks>, AppError> {
    let view = with_store(&app, move |store| {
        let tasks = project::project_tasks(store, &id)?;
        with_counters(store, &id, tasks)
    })
    .await?;
    Ok(Json(view))
}

/// POST /api/projects/{id}/tasks
pub async fn add_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<ProjectTasks>, AppError> {
    let view = with_store(&app, move |store| {
        store.hydrate::<Project>()?;
        let tasks = project::add_project_task(store, &id, draft)?;
        with_counters(store, &id, tasks)
    })
    .await?;
    Ok(Json(view))
}

/// POST /api/projects/{id}/tasks/{task_id}/status: sets `{"status": ...}`,
/// or advances to the next status when the body is empty.
pub async fn set_task_status(
    State(app): State<AppState>,
    Path((id, task_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ProjectTasks>, AppError> {
    let parsed: StatusBody = if body.iter().all(u8::is_ascii_whitespace) {
        StatusBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("invalid status body: {e}")))?
    };
    let view = with_store(&app, move |store| {
        store.hydrate::<Project>()?;
        let tasks = match parsed.status {
            Some(status) => project::set_project_task_status(store, &id, &task_id, status)?,
            None => project::mutate_tasks(store, &id, |tasks| task::cycle_status(tasks, &task_id))?,
        };
        with_counters(store, &id, tasks)
    })
    .await?;
    Ok(Json(view))
}
