//! Workspace synchronizer
//!
//! Reconciles the active workspace into the manifest registry, then
//! notifies observers and writes a snapshot to the store. A failed write
//! leaves the in-memory registry as it is and comes back as a warning.

use crate::error::PersistenceError;
use crate::events::{ChangeCause, EventBus, WorkspaceChange};
use crate::manifest::{ManifestEntry, ManifestRegistry, ManifestStore};
use crate::workspace::WorkspaceState;

/// Outcome of one synchronizer run
#[derive(Debug)]
pub struct SyncReport {
    /// Id of the entry that was touched
    pub id: String,
    /// A new entry was minted
    pub created: bool,
    /// An existing entry had its disk path updated
    pub relocated: bool,
    /// The registry could not be written; in-memory state is still current
    pub warning: Option<PersistenceError>,
}

pub struct Synchronizer {
    store: Box<dyn ManifestStore>,
}

impl Synchronizer {
    pub fn new(store: impl ManifestStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Load the registry, falling back to an empty one if the store can't be read
    pub fn load(&self) -> (ManifestRegistry, Option<PersistenceError>) {
        match self.store.load() {
            Ok(Some(mut registry)) => {
                if registry.repair() {
                    tracing::warn!("manifest last-opened pointed at an unknown workspace; cleared");
                }
                tracing::info!(workspaces = registry.len(), "manifest loaded");
                (registry, None)
            }
            Ok(None) => {
                tracing::info!("no manifest stored yet");
                (ManifestRegistry::new(), None)
            }
            Err(error) => {
                tracing::warn!(error = %error, "manifest load failed; starting empty");
                (ManifestRegistry::new(), Some(error))
            }
        }
    }

    /// Reconcile `workspace` into `registry`, notify, and persist
    pub fn run(
        &self,
        registry: &mut ManifestRegistry,
        workspace: &mut WorkspaceState,
        bus: &mut EventBus,
    ) -> SyncReport {
        let (id, created, relocated) = reconcile(registry, workspace);
        let warning = self.commit(registry, bus, ChangeCause::Activated { id: id.clone() });
        SyncReport {
            id,
            created,
            relocated,
            warning,
        }
    }

    /// Notify observers with a snapshot of `registry`, then write that snapshot
    pub fn commit(
        &self,
        registry: &ManifestRegistry,
        bus: &mut EventBus,
        cause: ChangeCause,
    ) -> Option<PersistenceError> {
        let change = WorkspaceChange {
            cause,
            registry: registry.clone(),
        };
        bus.emit(&change);
        self.persist(&change.registry).err()
    }

    /// Write a registry snapshot to the store
    pub fn persist(&self, snapshot: &ManifestRegistry) -> Result<(), PersistenceError> {
        match self.store.save(snapshot) {
            Ok(()) => {
                tracing::debug!(workspaces = snapshot.len(), "manifest saved");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "manifest save failed; keeping in-memory state");
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer").finish_non_exhaustive()
    }
}

/// Find or mint the entry, stamp it, make it last-opened.
/// Returns (id, created, relocated).
fn reconcile(registry: &mut ManifestRegistry, workspace: &mut WorkspaceState) -> (String, bool, bool) {
    let known_id = workspace
        .manifest_id()
        .filter(|id| registry.get(id).is_some())
        .map(str::to_string)
        .or_else(|| {
            registry
                .find_by_path(workspace.path())
                .map(|e| e.id().to_string())
        });

    let found = match known_id {
        Some(id) => registry.get_mut(&id),
        None => None,
    };

    let (id, created, relocated) = match found {
        Some(entry) => {
            entry.touch();
            let relocated = entry.set_disk_path(workspace.path());
            entry.set_display_name(workspace.name());
            if relocated {
                tracing::info!(id = entry.id(), path = %workspace.path().display(), "workspace relocated");
            }
            (entry.id().to_string(), false, relocated)
        }
        None => {
            let mut entry = ManifestEntry::new(workspace.name(), workspace.path());
            while registry.get(entry.id()).is_some() {
                entry = ManifestEntry::new(workspace.name(), workspace.path());
            }
            tracing::info!(id = entry.id(), path = %workspace.path().display(), "workspace registered");
            let id = entry.id().to_string();
            registry.insert(entry);
            (id, true, false)
        }
    };

    let sharing = registry
        .entries()
        .filter(|e| e.disk_path() == workspace.path())
        .count();
    if sharing > 1 {
        tracing::warn!(path = %workspace.path().display(), entries = sharing, "disk path shared by several workspaces");
    }

    registry.set_last_opened(&id);
    workspace.set_manifest_id(id.clone());
    (id, created, relocated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MemoryStore;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    fn setup() -> (Synchronizer, MemoryStore, ManifestRegistry, EventBus) {
        let store = MemoryStore::new();
        let sync = Synchronizer::new(store.clone());
        (sync, store, ManifestRegistry::new(), EventBus::new())
    }

    #[test]
    fn test_first_run_mints_entry() {
        let (sync, store, mut registry, mut bus) = setup();
        let mut ws = WorkspaceState::create("A", "/a", None);

        let report = sync.run(&mut registry, &mut ws, &mut bus);
        assert!(report.created);
        assert!(report.warning.is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.last_opened_id(), Some(report.id.as_str()));
        assert_eq!(ws.manifest_id(), Some(report.id.as_str()));
        assert_eq!(store.stored(), Some(registry));
    }

    #[test]
    fn test_same_path_same_id() {
        let (sync, _store, mut registry, mut bus) = setup();
        let mut first = WorkspaceState::create("A", "/a", None);
        let r1 = sync.run(&mut registry, &mut first, &mut bus);
        let t1 = registry.get(&r1.id).unwrap().last_accessed();

        // a fresh state for the same path, with no remembered id
        let mut second = WorkspaceState::create("A", "/a", None);
        let r2 = sync.run(&mut registry, &mut second, &mut bus);

        assert_eq!(r1.id, r2.id);
        assert!(!r2.created);
        assert!(registry.get(&r2.id).unwrap().last_accessed() > t1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_relocation_preserves_id() {
        let (sync, _store, mut registry, mut bus) = setup();
        let mut ws = WorkspaceState::create("A", "/a", None);
        let r1 = sync.run(&mut registry, &mut ws, &mut bus);

        let mut moved = ws.relocated("/a-moved");
        let r2 = sync.run(&mut registry, &mut moved, &mut bus);

        assert_eq!(r1.id, r2.id);
        assert!(r2.relocated);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&r2.id).unwrap().disk_path(), Path::new("/a-moved"));
    }

    #[test]
    fn test_rename_updates_display_name() {
        let (sync, _store, mut registry, mut bus) = setup();
        let mut ws = WorkspaceState::create("Old", "/a", None);
        sync.run(&mut registry, &mut ws, &mut bus);

        ws.rename("New");
        let report = sync.run(&mut registry, &mut ws, &mut bus);
        assert_eq!(registry.get(&report.id).unwrap().display_name(), "New");
    }

    #[test]
    fn test_one_notification_per_run_with_final_state() {
        let (sync, _store, mut registry, mut bus) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        bus.subscribe(move |change: &WorkspaceChange| {
            s.borrow_mut().push(change.registry.last_opened_id().map(str::to_string));
        });

        let mut ws = WorkspaceState::create("A", "/a", None);
        let report = sync.run(&mut registry, &mut ws, &mut bus);

        assert_eq!(*seen.borrow(), vec![Some(report.id)]);
    }

    #[test]
    fn test_persistence_failure_is_soft() {
        let (sync, store, mut registry, mut bus) = setup();
        store.set_fail_writes(true);

        let mut ws = WorkspaceState::create("A", "/a", None);
        let report = sync.run(&mut registry, &mut ws, &mut bus);

        assert!(matches!(report.warning, Some(PersistenceError::Io { .. })));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.last_opened_id(), Some(report.id.as_str()));
        assert!(store.stored().is_none());

        store.set_fail_writes(false);
        sync.persist(&registry).unwrap();
        assert_eq!(store.stored(), Some(registry));
    }

    #[test]
    fn test_load_falls_back_to_empty() {
        let (sync, _store, _, _) = setup();
        let (registry, warning) = sync.load();
        assert!(registry.is_empty());
        assert!(warning.is_none());
    }
}
