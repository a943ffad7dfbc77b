//! Slots in a single redb database.
//!
//! One `slots` table maps the slot key to the envelope text. Each write is
//! its own committed transaction, so a slot is always either the old or the
//! new value, never a mix.

use super::SlotBackend;
use crate::error::{Result, RouteError};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");

fn db_err(e: impl std::fmt::Display) -> RouteError {
    RouteError::Storage(e.to_string())
}

pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open or create the database at `path`, creating the table up front so
    /// reads never hit a missing table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(SLOTS).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }
}

impl SlotBackend for RedbBackend {
    fn name(&self) -> &'static str {
        "redb"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(SLOTS).map_err(db_err)?;
        let value = table
            .get(key)
            .map_err(db_err)?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write(&self, key: &str, text: &str) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(SLOTS).map_err(db_err)?;
            table.insert(key, text).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let existed = {
            let mut table = wt.open_table(SLOTS).map_err(db_err)?;
            let removed = table.remove(key).map_err(db_err)?;
            removed.is_some()
        };
        wt.commit().map_err(db_err)?;
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(SLOTS).map_err(db_err)?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (k, _) = entry.map_err(db_err)?;
            keys.push(k.value().to_string());
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reopen_keeps_slots() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".route/slots.redb");
        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.write("lifepath_roadmap", "[]").unwrap();
        }
        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(backend.read("lifepath_roadmap").unwrap().as_deref(), Some("[]"));
        assert!(backend.read("lifepath_spending").unwrap().is_none());
    }

    #[test]
    fn remove_reports_presence() {
        let dir = TempDir::new().unwrap();
        let backend = RedbBackend::open(&dir.path().join("slots.redb")).unwrap();
        backend.write("lifepath_venture", "[]").unwrap();
        assert!(backend.remove("lifepath_venture").unwrap());
        assert!(!backend.remove("lifepath_venture").unwrap());
    }
}
