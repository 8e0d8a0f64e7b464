//! Application context
//!
//! Owns the process-wide state: the manifest registry, the single live
//! workspace, the synchronizer and the observer list. Initialization order
//! is load registry, then select or create a workspace, then synchronize.
//! Teardown flushes the registry.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::editor::EditorRecord;
use crate::error::{PersistenceError, WorkspaceError, WorkspaceResult};
use crate::events::{ChangeCause, EventBus, SubscriptionId, WorkspaceChange};
use crate::manifest::{ManifestEntry, ManifestRegistry, ManifestStore};
use crate::sync::{SyncReport, Synchronizer};
use crate::tray::{RecentMenu, TrayIntent};
use crate::workspace::{CloseMode, ConfigUpdate, WorkspaceState};

/// What happened during startup
#[derive(Debug, Default)]
pub struct Startup {
    /// The registry could not be read; started from an empty one
    pub load_warning: Option<PersistenceError>,
    /// Synchronizer report for the restored workspace
    pub restored: Option<SyncReport>,
    /// The last-opened workspace no longer resolves on disk
    pub missing: Option<PathBuf>,
}

/// Whether the application should keep running after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    registry: ManifestRegistry,
    active: Option<WorkspaceState>,
    sync: Synchronizer,
    events: EventBus,
    /// The last registry write failed and a flush is owed
    unflushed: bool,
}

impl AppContext {
    /// Load the registry and restore the last-opened workspace if it still exists
    pub fn start(config: AppConfig, store: impl ManifestStore + 'static) -> (Self, Startup) {
        let sync = Synchronizer::new(store);
        let (registry, load_warning) = sync.load();

        let mut app = Self {
            config,
            registry,
            active: None,
            sync,
            events: EventBus::new(),
            unflushed: false,
        };
        let mut startup = Startup {
            load_warning,
            ..Startup::default()
        };

        if let Some(entry) = app.registry.last_opened().cloned() {
            match app.activate_entry(entry.id(), CloseMode::Clean) {
                Ok(report) => startup.restored = Some(report),
                Err(WorkspaceError::WorkspaceNotFound(path)) => {
                    tracing::warn!(id = entry.id(), path = %path.display(), "last workspace is missing");
                    startup.missing = Some(path);
                }
                Err(error) => tracing::warn!(error = %error, "could not restore last workspace"),
            }
        }

        (app, startup)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    pub fn workspace(&self) -> Option<&WorkspaceState> {
        self.active.as_ref()
    }

    fn active_mut(&mut self) -> WorkspaceResult<&mut WorkspaceState> {
        self.active.as_mut().ok_or(WorkspaceError::NoActiveWorkspace)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&WorkspaceChange) + 'static,
    {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Make `workspace` the live one, replacing the current one under `mode`
    pub fn switch_to(
        &mut self,
        mut workspace: WorkspaceState,
        mode: CloseMode,
    ) -> WorkspaceResult<SyncReport> {
        if let Some(current) = self.active.as_mut() {
            current.release(mode)?;
        }

        let report = self.sync.run(&mut self.registry, &mut workspace, &mut self.events);
        self.note_persistence(&report.warning);
        tracing::info!(id = %report.id, path = %workspace.path().display(), "workspace active");
        self.active = Some(workspace);
        Ok(report)
    }

    /// Open the workspace at `path`, reusing its manifest entry if one exists.
    /// Existing directories are looked up by their canonical path.
    pub fn open_path(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        mode: CloseMode,
    ) -> WorkspaceResult<SyncReport> {
        let path = canonical(path.as_ref());
        let workspace = match self.registry.find_by_path(&path) {
            Some(entry) => WorkspaceState::from_manifest(entry),
            None => WorkspaceState::create(name, path, None),
        };
        self.switch_to(workspace, mode)
    }

    /// Open a known workspace by manifest id.
    ///
    /// Fails with `WorkspaceNotFound` if its directory is gone; the entry is
    /// kept so it can be relocated or removed.
    pub fn activate_entry(&mut self, id: &str, mode: CloseMode) -> WorkspaceResult<SyncReport> {
        let entry = self
            .registry
            .get(id)
            .ok_or_else(|| WorkspaceError::EntryNotFound(id.to_string()))?;
        if !entry.resolves() {
            return Err(WorkspaceError::WorkspaceNotFound(entry.disk_path().to_path_buf()));
        }
        let workspace = WorkspaceState::from_manifest(entry);
        self.switch_to(workspace, mode)
    }

    /// Move the active workspace to a new path, keeping its identity
    pub fn relocate_active(&mut self, path: impl Into<PathBuf>) -> WorkspaceResult<SyncReport> {
        let path: PathBuf = path.into();
        let path = canonical(&path);
        let current = self.active.take().ok_or(WorkspaceError::NoActiveWorkspace)?;
        let mut moved = current.relocated(path);
        let report = self.sync.run(&mut self.registry, &mut moved, &mut self.events);
        self.note_persistence(&report.warning);
        self.active = Some(moved);
        Ok(report)
    }

    pub fn open_editor(&mut self, file: &str, name: &str, content: &str) -> WorkspaceResult<()> {
        self.active_mut()?.open_editor(file, name, content)?;
        self.notify(ChangeCause::Editors);
        Ok(())
    }

    pub fn mutate_editor(&mut self, file: &str, content: &str) -> WorkspaceResult<bool> {
        let changed = self.active_mut()?.mutate_editor(file, content)?;
        if changed {
            self.notify(ChangeCause::Editors);
        }
        Ok(changed)
    }

    /// Record an editor as saved. Saving an already clean editor is a no-op.
    pub fn mark_saved(&mut self, file: &str) -> WorkspaceResult<bool> {
        let changed = self.active_mut()?.mark_saved(file)?;
        if changed {
            self.notify(ChangeCause::Editors);
        }
        Ok(changed)
    }

    pub fn close_editor(&mut self, file: &str, mode: CloseMode) -> WorkspaceResult<EditorRecord> {
        let removed = self.active_mut()?.close_editor(file, mode)?;
        self.notify(ChangeCause::Editors);
        Ok(removed)
    }

    pub fn set_configuration(&mut self, update: ConfigUpdate) -> WorkspaceResult<bool> {
        let changed = self.active_mut()?.set_configuration(update);
        if changed {
            self.notify(ChangeCause::Configuration);
        }
        Ok(changed)
    }

    /// Rename the active workspace and its manifest entry
    pub fn rename_active(&mut self, name: &str) -> WorkspaceResult<bool> {
        let workspace = self.active.as_mut().ok_or(WorkspaceError::NoActiveWorkspace)?;
        if !workspace.rename(name) {
            return Ok(false);
        }
        if let Some(id) = workspace.manifest_id() {
            if let Some(entry) = self.registry.get_mut(id) {
                entry.set_display_name(name);
            }
        }
        self.commit(ChangeCause::Configuration);
        Ok(true)
    }

    /// Point a manifest entry at a new directory, e.g. after the user found a moved workspace
    pub fn relocate_entry(&mut self, id: &str, path: &Path) -> WorkspaceResult<bool> {
        let changed = self.registry.relocate_entry(id, path)?;
        if changed {
            self.commit(ChangeCause::EntryRelocated { id: id.to_string() });
        }
        Ok(changed)
    }

    /// Forget a workspace permanently. The active workspace can't be removed.
    pub fn remove_entry(&mut self, id: &str) -> WorkspaceResult<ManifestEntry> {
        if self.active.as_ref().and_then(WorkspaceState::manifest_id) == Some(id) {
            return Err(WorkspaceError::EntryActive(id.to_string()));
        }
        let entry = self.registry.remove_entry(id)?;
        tracing::info!(id, path = %entry.disk_path().display(), "workspace removed from manifest");
        self.commit(ChangeCause::EntryRemoved { id: id.to_string() });
        Ok(entry)
    }

    pub fn recent_menu(&self) -> RecentMenu {
        RecentMenu::from_registry(&self.registry, self.config.recent_limit)
    }

    /// Route a tray selection through the regular operations
    pub fn handle_intent(&mut self, intent: TrayIntent) -> WorkspaceResult<Flow> {
        match intent {
            TrayIntent::OpenWorkspace(id) => {
                self.activate_entry(&id, CloseMode::Clean)?;
                Ok(Flow::Continue)
            }
            TrayIntent::Quit => {
                self.shutdown(CloseMode::Clean)?;
                Ok(Flow::Quit)
            }
        }
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed
    }

    /// Write the registry now
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let result = self.sync.persist(&self.registry);
        self.unflushed = result.is_err();
        result
    }

    /// Leave the active workspace under `mode` and flush the registry
    pub fn shutdown(&mut self, mode: CloseMode) -> WorkspaceResult<()> {
        if let Some(workspace) = self.active.as_mut() {
            workspace.release(mode)?;
        }
        self.flush()?;
        tracing::info!("shutdown complete");
        Ok(())
    }

    /// Notify observers about a workspace-only change
    fn notify(&mut self, cause: ChangeCause) {
        let change = WorkspaceChange {
            cause,
            registry: self.registry.clone(),
        };
        self.events.emit(&change);
    }

    /// Notify observers about a registry change and persist it
    fn commit(&mut self, cause: ChangeCause) {
        let warning = self.sync.commit(&self.registry, &mut self.events, cause);
        self.note_persistence(&warning);
    }

    fn note_persistence(&mut self, warning: &Option<PersistenceError>) {
        self.unflushed = warning.is_some();
    }
}

/// Resolve `..`, `.` and symlinks so one directory maps to one manifest entry.
/// Paths that don't exist yet are kept as given.
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
