use crate::config::Config;
use crate::entities::{
    Client, Connection, Habit, Inspiration, Investor, Kpi, Milestone, Project, Reflection,
    Resource, Task, Transaction,
};
use crate::entity::Entity;
use crate::error::{Result, RouteError};
use crate::io;
use crate::paths;
use crate::store::{Hydration, Origin, Store};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A root directory with its config and an open slot store.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub store: Store,
}

/// What `init` did, per step.
#[derive(Debug, Default, Serialize)]
pub struct InitReport {
    pub config_created: bool,
    pub seeded: Vec<String>,
}

impl Workspace {
    /// Open `root`. A missing config falls back to defaults.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load_or_default(root)?;
        let store = Store::open(root, &config.storage)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            store,
        })
    }

    /// Create `.route/`, write a config if missing and seed every feature slot
    /// that is absent. Safe to run again.
    pub fn init(root: &Path, name: &str) -> Result<(Self, InitReport)> {
        io::ensure_dir(&paths::route_dir(root))?;
        let mut report = InitReport::default();
        if !paths::config_path(root).exists() {
            Config::new(name).save(root)?;
            report.config_created = true;
        }
        let ws = Self::open(root)?;
        if let crate::config::StorageBackend::File = ws.config.storage.backend {
            io::ensure_dir(&paths::slots_dir(root))?;
        }
        report.seeded = ws.seed_all()?;
        tracing::info!(root = %root.display(), seeded = report.seeded.len(), "initialized workspace");
        Ok((ws, report))
    }

    /// Hydrate every feature slot; returns the keys that were (re)seeded.
    pub fn seed_all(&self) -> Result<Vec<String>> {
        let mut seeded = Vec::new();
        let mut note = |key: &str, origin: Origin| {
            if origin != Origin::Stored {
                seeded.push(key.to_string());
            }
        };
        note(Task::SLOT, self.store.hydrate::<Task>()?.origin);
        note(Project::SLOT, self.store.hydrate::<Project>()?.origin);
        note(Client::SLOT, self.store.hydrate::<Client>()?.origin);
        note(Resource::SLOT, self.store.hydrate::<Resource>()?.origin);
        note(Habit::SLOT, self.store.hydrate::<Habit>()?.origin);
        note(Connection::SLOT, self.store.hydrate::<Connection>()?.origin);
        note(Kpi::SLOT, self.store.hydrate::<Kpi>()?.origin);
        note(Milestone::SLOT, self.store.hydrate::<Milestone>()?.origin);
        note(Transaction::SLOT, self.store.hydrate::<Transaction>()?.origin);
        note(Investor::SLOT, self.store.hydrate::<Investor>()?.origin);
        note(Reflection::SLOT, self.store.hydrate::<Reflection>()?.origin);
        note(Inspiration::SLOT, self.store.hydrate::<Inspiration>()?.origin);
        Ok(seeded)
    }
}

fn seed_list<E: Entity>() -> Result<Vec<Value>> {
    E::defaults()
        .iter()
        .map(|e| serde_json::to_value(e).map_err(RouteError::from))
        .collect()
}

fn seed_for(key: &str) -> Result<Option<Vec<Value>>> {
    let seed = match key {
        paths::TASKS_SLOT => seed_list::<Task>()?,
        paths::PROJECTS_SLOT => seed_list::<Project>()?,
        paths::CLIENTS_SLOT => seed_list::<Client>()?,
        paths::RESOURCES_SLOT => seed_list::<Resource>()?,
        paths::HABITS_SLOT => seed_list::<Habit>()?,
        paths::NETWORK_SLOT => seed_list::<Connection>()?,
        paths::PERFORMANCE_SLOT => seed_list::<Kpi>()?,
        paths::ROADMAP_SLOT => seed_list::<Milestone>()?,
        paths::SPENDING_SLOT => seed_list::<Transaction>()?,
        paths::VENTURE_SLOT => seed_list::<Investor>()?,
        paths::REFLECTIONS_SLOT => seed_list::<Reflection>()?,
        paths::INSPIRATIONS_SLOT => seed_list::<Inspiration>()?,
        _ if paths::split_project_slot(key).is_some() => Vec::new(),
        _ => return Ok(None),
    };
    Ok(Some(seed))
}

/// Untyped view of one slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub key: String,
    /// `None` for slots that are never seeded.
    pub origin: Option<Origin>,
    pub data: Value,
}

/// Hydrate any slot as raw JSON. Known list slots seed like their feature
/// does; other slots are read as-is (`null` when absent).
pub fn hydrate_slot(store: &Store, key: &str) -> Result<SlotView> {
    match seed_for(key)? {
        Some(defaults) => {
            let Hydration { items, origin } = store.seed_if_empty::<Value>(key, defaults)?;
            Ok(SlotView {
                key: key.to_string(),
                origin: Some(origin),
                data: Value::Array(items),
            })
        }
        None => Ok(SlotView {
            key: key.to_string(),
            origin: None,
            data: store.load_raw(key)?.unwrap_or(Value::Null),
        }),
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("root", &self.root)
            .field("backend", &self.store.backend_name())
            .finish()
    }
}
