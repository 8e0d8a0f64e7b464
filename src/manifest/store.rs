//! Durable storage for the manifest registry
//!
//! Stored by default in ~/.config/noot/workspaces.json

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::PersistenceError;

use super::registry::ManifestRegistry;

/// Where the registry lives between runs
pub trait ManifestStore {
    /// Read the stored registry. `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ManifestRegistry>, PersistenceError>;

    /// Write a registry snapshot
    fn save(&self, registry: &ManifestRegistry) -> Result<(), PersistenceError>;
}

/// Get the default path to the manifest file
pub fn default_manifest_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noot")
        .join("workspaces.json")
}

/// Registry stored as pretty JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(default_manifest_path())
    }
}

impl ManifestStore for JsonFileStore {
    fn load(&self) -> Result<Option<ManifestRegistry>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        let registry = serde_json::from_str(&content)?;
        Ok(Some(registry))
    }

    fn save(&self, registry: &ManifestRegistry) -> Result<(), PersistenceError> {
        // Ensure config directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(registry)?;
        fs::write(&self.path, content).map_err(|e| PersistenceError::io(&self.path, e))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    stored: Option<ManifestRegistry>,
    saves: usize,
    fail_writes: bool,
}

/// In-process store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: ManifestRegistry) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().stored = Some(registry);
        store
    }

    /// Make subsequent writes fail, as a full disk would
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn stored(&self) -> Option<ManifestRegistry> {
        self.inner.borrow().stored.clone()
    }

    /// Number of successful writes
    pub fn saves(&self) -> usize {
        self.inner.borrow().saves
    }
}

impl ManifestStore for MemoryStore {
    fn load(&self) -> Result<Option<ManifestRegistry>, PersistenceError> {
        Ok(self.inner.borrow().stored.clone())
    }

    fn save(&self, registry: &ManifestRegistry) -> Result<(), PersistenceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(PersistenceError::io(
                "memory",
                std::io::Error::other("writes disabled"),
            ));
        }
        inner.stored = Some(registry.clone());
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("workspaces.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("workspaces.json"));

        let mut registry = ManifestRegistry::new();
        registry.insert(ManifestEntry::new("Notes", "/notes"));
        store.save(&registry).unwrap();

        assert_eq!(store.load().unwrap(), Some(registry));
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workspaces.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save(&ManifestRegistry::new()).unwrap();
        assert_eq!(handle.saves(), 1);

        handle.set_fail_writes(true);
        assert!(store.save(&ManifestRegistry::new()).is_err());
        assert_eq!(handle.saves(), 1);
    }
}
