use crate::error::Result;
use crate::paths;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workspace data attached to a companion request. Slots are carried as
/// raw JSON, exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub clients: Vec<Value>,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.projects.is_empty() && self.clients.is_empty()
    }
}

pub fn build(store: &Store) -> Result<ChatContext> {
    Ok(ChatContext {
        tasks: store.load(paths::TASKS_SLOT)?,
        projects: store.load(paths::PROJECTS_SLOT)?,
        clients: store.load(paths::CLIENTS_SLOT)?,
    })
}
