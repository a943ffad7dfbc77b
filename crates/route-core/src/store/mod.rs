//! Slot store: the persistence layer behind every feature list.
//!
//! A slot is one named entry holding a JSON value. Writes always wrap the
//! value in a versioned envelope:
//!
//! ```text
//! { "version": 2, "data": [ {..record..}, ... ] }
//! ```
//!
//! A value without an envelope (for example a bare array copied out of
//! browser local storage) is read as schema v1 and migrated on the way in.
//! An unreadable value is never surfaced as an error: it is logged and
//! treated as "no data", which makes hydration fall back to the seed list.
//! A readable list with a few records of the wrong shape is not unreadable:
//! those records are skipped on typed reads and carried through writes.
//!
//! Every save overwrites the whole slot. There is no version check and no
//! merge; the last writer wins.

mod embedded;
mod file;
mod memory;

pub use embedded::RedbBackend;
pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::config::{StorageBackend, StorageConfig};
use crate::entity::Entity;
use crate::error::{Result, RouteError};
use crate::migrations::{self, SCHEMA_VERSION};
use crate::paths;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// Raw key/value access for slot text. Keys are validated by [`Store`]
/// before they reach a backend.
pub trait SlotBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, text: &str) -> Result<()>;
    /// Returns `true` if the slot existed.
    fn remove(&self, key: &str) -> Result<bool>;
    fn keys(&self) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Envelope / Hydration
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Where the items returned by a hydration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The slot held readable data (possibly an empty list).
    Stored,
    /// The slot key was absent; defaults were written.
    Seeded,
    /// The slot held an unreadable value; defaults replaced it.
    Recovered,
}

#[derive(Debug, Clone)]
pub struct Hydration<T> {
    pub items: Vec<T>,
    pub origin: Origin,
}

impl<T> Hydration<T> {
    pub fn was_seeded(&self) -> bool {
        !matches!(self.origin, Origin::Stored)
    }
}

enum SlotRead {
    Absent,
    Unreadable,
    Present(Value),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    backend: Box<dyn SlotBackend>,
}

impl Store {
    pub fn new(backend: impl SlotBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Open the backend selected in `cfg` under `root`.
    pub fn open(root: &Path, cfg: &StorageConfig) -> Result<Self> {
        let store = match cfg.backend {
            StorageBackend::File => Self::new(FileBackend::new(root)),
            StorageBackend::Redb => Self::new(RedbBackend::open(&paths::redb_path(root))?),
        };
        tracing::debug!(backend = store.backend_name(), root = %root.display(), "opened slot store");
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        paths::validate_slot_key(key)?;
        Ok(self.backend.read(key)?.is_some())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    fn read_slot(&self, key: &str) -> Result<SlotRead> {
        paths::validate_slot_key(key)?;
        let Some(text) = self.backend.read(key)? else {
            return Ok(SlotRead::Absent);
        };
        match decode(key, &text) {
            Ok(value) => Ok(SlotRead::Present(value)),
            Err(e) => {
                tracing::warn!(slot = key, error = %e, "ignoring unreadable slot");
                Ok(SlotRead::Unreadable)
            }
        }
    }

    /// Current (migrated) JSON for `key`, or `None` when absent or unreadable.
    pub fn load_raw(&self, key: &str) -> Result<Option<Value>> {
        match self.read_slot(key)? {
            SlotRead::Present(v) => Ok(Some(v)),
            SlotRead::Absent | SlotRead::Unreadable => Ok(None),
        }
    }

    /// Split a list value into the records that decode as `T` and the raw
    /// records that do not. `None` when the value is not a list at all.
    fn split_records<T: DeserializeOwned>(key: &str, value: Value) -> Option<(Vec<T>, Vec<Value>)> {
        let Value::Array(records) = value else {
            tracing::warn!(slot = key, "slot does not hold a list");
            return None;
        };
        let mut items = Vec::with_capacity(records.len());
        let mut kept = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<T>(record.clone()) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(slot = key, index, error = %e, "skipping record that does not match its shape");
                    kept.push(record);
                }
            }
        }
        Some((items, kept))
    }

    fn typed<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(slot = key, error = %e, "slot does not match its record shape");
                None
            }
        }
    }

    /// Records in `key`; empty when the slot is absent or unreadable.
    /// Records of the wrong shape are skipped.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self
            .load_raw(key)?
            .and_then(|v| Self::split_records(key, v))
            .map(|(items, _)| items)
            .unwrap_or_default())
    }

    /// Return the stored list, or write `defaults` when the slot is absent or
    /// unreadable. A present list is returned with no write, whether it is
    /// empty or holds records of the wrong shape.
    pub fn seed_if_empty<T>(&self, key: &str, defaults: Vec<T>) -> Result<Hydration<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let origin = match self.read_slot(key)? {
            SlotRead::Present(value) => match Self::split_records::<T>(key, value) {
                Some((items, _)) => {
                    return Ok(Hydration {
                        items,
                        origin: Origin::Stored,
                    })
                }
                None => Origin::Recovered,
            },
            SlotRead::Unreadable => Origin::Recovered,
            SlotRead::Absent => Origin::Seeded,
        };
        self.save(key, &defaults)?;
        tracing::info!(slot = key, count = defaults.len(), origin = ?origin, "seeded slot with defaults");
        Ok(Hydration {
            items: defaults,
            origin,
        })
    }

    /// Hydrate an entity's feature slot with its seed list.
    pub fn hydrate<E: Entity>(&self) -> Result<Hydration<E>> {
        self.seed_if_empty(E::SLOT, E::defaults())
    }

    pub fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.load_raw(key)?.and_then(|v| Self::typed(key, v)))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Overwrite `key` with `data` wrapped in the current envelope.
    pub fn save_raw(&self, key: &str, data: Value) -> Result<()> {
        paths::validate_slot_key(key)?;
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            data,
        };
        let text = serde_json::to_string(&envelope)?;
        self.backend.write(key, &text)?;
        tracing::debug!(slot = key, bytes = text.len(), "saved slot");
        Ok(())
    }

    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.save_raw(key, serde_json::to_value(items)?)
    }

    pub fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.save_raw(key, serde_json::to_value(value)?)
    }

    /// Store a value written by a client as if it had been read back: bare
    /// values are migrated from v1, envelopes from their own version.
    pub fn put(&self, key: &str, value: Value) -> Result<()> {
        paths::validate_slot_key(key)?;
        let data = upgrade(key, value).map_err(|e| RouteError::validation(e.to_string()))?;
        self.save_raw(key, data)
    }

    /// Load, apply one pure list update, save. Returns the new list.
    /// Records that do not decode as `E` are written back after it.
    pub fn mutate<E, F>(&self, key: &str, f: F) -> Result<Vec<E>>
    where
        E: Entity,
        F: FnOnce(&[E]) -> Result<Vec<E>>,
    {
        let (current, kept) = self
            .load_raw(key)?
            .and_then(|v| Self::split_records::<E>(key, v))
            .unwrap_or_default();
        let next = f(&current)?;
        if kept.is_empty() {
            self.save(key, &next)?;
        } else {
            let mut records = Vec::with_capacity(next.len() + kept.len());
            for item in &next {
                records.push(serde_json::to_value(item)?);
            }
            records.extend(kept);
            self.save_raw(key, Value::Array(records))?;
        }
        Ok(next)
    }

    pub fn clear(&self, key: &str) -> Result<bool> {
        paths::validate_slot_key(key)?;
        self.backend.remove(key)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = self.backend.keys()?;
        keys.sort();
        Ok(keys)
    }

    // -----------------------------------------------------------------------
    // Export / import
    // -----------------------------------------------------------------------

    /// Every readable slot as `{key: data}`.
    pub fn export(&self) -> Result<BTreeMap<String, Value>> {
        let mut out = BTreeMap::new();
        for key in self.keys()? {
            if let Some(v) = self.load_raw(&key)? {
                out.insert(key, v);
            }
        }
        Ok(out)
    }

    /// Write each entry as a bare value; it is migrated on the next read.
    /// Returns the number of slots written.
    pub fn import(&self, dump: &BTreeMap<String, Value>) -> Result<usize> {
        for key in dump.keys() {
            paths::validate_slot_key(key)?;
        }
        for (key, value) in dump {
            self.backend.write(key, &serde_json::to_string(value)?)?;
        }
        Ok(dump.len())
    }
}

fn decode(key: &str, text: &str) -> Result<Value> {
    upgrade(key, serde_json::from_str(text)?)
}

fn upgrade(key: &str, value: Value) -> Result<Value> {
    let (version, data) = match value {
        Value::Object(ref obj)
            if obj.len() == 2 && obj.contains_key("version") && obj.contains_key("data") =>
        {
            let env: Envelope = serde_json::from_value(value)?;
            (env.version, env.data)
        }
        other => (1, other),
    };
    migrations::migrate_slot(key, version, data)
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl<B: SlotBackend + ?Sized> SlotBackend for std::sync::Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }
    fn write(&self, key: &str, text: &str) -> Result<()> {
        (**self).write(key, text)
    }
    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
