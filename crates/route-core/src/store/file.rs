use super::SlotBackend;
use crate::error::Result;
use crate::{io, paths};
use std::path::{Path, PathBuf};

/// One `<key>.json` file per slot under `<root>/.route/slots/`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl SlotBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        io::read_if_exists(&paths::slot_path(&self.root, key))
    }

    fn write(&self, key: &str, text: &str) -> Result<()> {
        io::atomic_write(&paths::slot_path(&self.root, key), text.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        io::remove_if_exists(&paths::slot_path(&self.root, key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let dir = paths::slots_dir(&self.root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(paths::SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if paths::validate_slot_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_slot_reads_none() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        assert!(backend.read("lifepath_clients").unwrap().is_none());
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn keys_skip_foreign_files() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.write("lifepath_habits", "[]").unwrap();
        std::fs::write(paths::slots_dir(dir.path()).join("notes.txt"), "x").unwrap();
        std::fs::write(paths::slots_dir(dir.path()).join("Bad Name.json"), "x").unwrap();
        assert_eq!(backend.keys().unwrap(), vec!["lifepath_habits".to_string()]);
    }

    #[test]
    fn remove_reports_presence() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.write("lifepath_tasks", "[]").unwrap();
        assert!(backend.remove("lifepath_tasks").unwrap());
        assert!(!backend.remove("lifepath_tasks").unwrap());
    }
}
