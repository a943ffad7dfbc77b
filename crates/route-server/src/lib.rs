pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// All API routes behind open CORS and request tracing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Raw slots
        .route("/api/slots", get(routes::slots::list_slots))
        .route(
            "/api/slots/{key}",
            get(routes::slots::get_slot)
                .put(routes::slots::put_slot)
                .delete(routes::slots::clear_slot),
        )
        // Clients
        .route("/api/clients", get(routes::clients::list_clients))
        .route("/api/clients", post(routes::clients::create_client))
        .route("/api/clients/{id}", patch(routes::clients::update_client))
        .route("/api/clients/{id}", delete(routes::clients::delete_client))
        // Habits
        .route("/api/habits", get(routes::habits::list_habits))
        .route("/api/habits", post(routes::habits::create_habit))
        .route("/api/habits/{id}/toggle", post(routes::habits::toggle_habit))
        .route("/api/habits/{id}", delete(routes::habits::delete_habit))
        // Resources
        .route("/api/resources", get(routes::resources::list_resources))
        .route("/api/resources", post(routes::resources::create_resource))
        .route("/api/resources/{id}/pin", post(routes::resources::pin_resource))
        .route("/api/resources/{id}", delete(routes::resources::delete_resource))
        // Projects + project tasks
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/{id}", delete(routes::projects::delete_project))
        .route("/api/projects/{id}/tasks", get(routes::projects::list_tasks))
        .route("/api/projects/{id}/tasks", post(routes::projects::add_task))
        .route(
            "/api/projects/{id}/tasks/{task_id}/status",
            post(routes::projects::set_task_status),
        )
        // Roadmap
        .route("/api/roadmap", get(routes::roadmap::list_milestones))
        .route("/api/roadmap/order", put(routes::roadmap::reorder_milestones))
        // Palette
        .route("/api/palette", get(routes::palette::search))
        // Access, companion, billing
        .route("/api/access/check", post(routes::access::check_code))
        .route("/api/chat", post(routes::chat::chat))
        .route(
            "/api/create-checkout-session",
            post(routes::checkout::create_checkout_session),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server for the workspace at `root`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Serve on an already bound listener; the CLI binds first so it can print
/// the port the OS picked for `--port 0`.
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = AppState::new(root)?;
    tracing::info!(
        backend = app_state.store.backend_name(),
        "route API listening on http://localhost:{actual_port}"
    );
    let app = build_router(app_state);

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/slots");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
