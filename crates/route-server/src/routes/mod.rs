pub mod access;
pub mod chat;
pub mod checkout;
pub mod clients;
pub mod habits;
pub mod palette;
pub mod projects;
pub mod resources;
pub mod roadmap;
pub mod slots;

use crate::error::AppError;
use crate::state::AppState;
use route_core::Store;

/// Run blocking store work off the async runtime.
pub(crate) async fn with_store<T, F>(app: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> route_core::Result<T> + Send + 'static,
{
    let store = app.store.clone();
    let value = tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(AppError::join)??;
    Ok(value)
}
