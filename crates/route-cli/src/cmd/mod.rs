pub mod access;
pub mod chat;
pub mod client;
pub mod config;
pub mod habit;
pub mod init;
pub mod kpi;
pub mod profile;
pub mod project;
pub mod resource;
pub mod roadmap;
pub mod search;
pub mod serve;
pub mod slot;
pub mod spend;
pub mod task;

use anyhow::Context;
use route_core::entity::Entity;
use route_core::{list, RouteError, Store, Workspace};
use std::path::Path;

pub fn open(root: &Path) -> anyhow::Result<Workspace> {
    Workspace::open(root).with_context(|| format!("failed to open workspace at {}", root.display()))
}

/// Hydrate `E`'s slot, then apply `f` and save.
pub fn mutate<E, F>(store: &Store, f: F) -> route_core::Result<Vec<E>>
where
    E: Entity,
    F: FnOnce(&[E]) -> route_core::Result<Vec<E>>,
{
    store.hydrate::<E>()?;
    store.mutate(E::SLOT, f)
}

/// Remove one record from `E`'s slot; an unknown id is an error.
pub fn remove<E: Entity>(store: &Store, id: &str) -> route_core::Result<()> {
    mutate::<E, _>(store, |items| {
        list::find(items, id).ok_or_else(|| RouteError::not_found(E::KIND, id))?;
        Ok(list::remove(items, id))
    })?;
    Ok(())
}

/// The record with `id` in `items`, after a mutation that must have kept it.
pub fn pick<E: Entity>(items: &[E], id: &str) -> route_core::Result<E> {
    list::find(items, id)
        .cloned()
        .ok_or_else(|| RouteError::not_found(E::KIND, id))
}

pub fn print_removed(kind: &str, id: &str, json: bool) -> anyhow::Result<()> {
    if json {
        crate::output::print_json(&serde_json::json!({ "removed": id }))
    } else {
        println!("Removed {kind} [{id}]");
        Ok(())
    }
}

pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
