//! Workspace state management
//!
//! The active workspace: its configuration and the editors open in it.
//! Only one is live at a time; switching workspaces replaces it wholesale.

use std::path::{Path, PathBuf};

use crate::editor::EditorRecord;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::manifest::ManifestEntry;
use crate::util::time::{self, Timestamp};

use super::config::{ConfigUpdate, WorkspaceConfig};

/// Document seeded into a workspace opened with no editors
pub const DEFAULT_EDITOR_FILE: &str = "README.md";
pub const DEFAULT_EDITOR_NAME: &str = "README";

/// How to treat unsaved changes when closing an editor or leaving a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Refuse if anything is unsaved
    Clean,
    /// Drop unsaved changes
    Discard,
    /// The caller has written the content out; record it as saved first
    Saved,
}

#[derive(Debug, Clone)]
pub struct WorkspaceState {
    name: String,
    /// Canonical on-disk identity, fixed for the lifetime of this state
    path: PathBuf,
    /// Manifest id, once the synchronizer has seen this workspace
    manifest_id: Option<String>,
    last_change: Timestamp,
    config: WorkspaceConfig,
    editors: Vec<EditorRecord>,
}

impl WorkspaceState {
    /// Create a workspace with a single seeded editor
    pub fn create(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        config: Option<WorkspaceConfig>,
    ) -> Self {
        let seed = EditorRecord::open(DEFAULT_EDITOR_FILE, DEFAULT_EDITOR_NAME, "");
        Self {
            name: name.into(),
            path: path.into(),
            manifest_id: None,
            last_change: seed.changed(),
            config: config.unwrap_or_default(),
            editors: vec![seed],
        }
    }

    /// Create a workspace with the given editors, seeding one if the list is empty
    pub fn with_editors(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        config: Option<WorkspaceConfig>,
        editors: Vec<EditorRecord>,
    ) -> WorkspaceResult<Self> {
        let mut workspace = Self::create(name, path, config);
        if editors.is_empty() {
            return Ok(workspace);
        }

        workspace.editors.clear();
        for editor in editors {
            if workspace.editor(editor.file()).is_some() {
                return Err(WorkspaceError::DuplicateEditor(editor.file().to_string()));
            }
            workspace.editors.push(editor);
        }
        workspace.touch();
        Ok(workspace)
    }

    /// Open a known workspace from its manifest entry
    pub fn from_manifest(entry: &ManifestEntry) -> Self {
        let mut workspace = Self::create(entry.display_name(), entry.disk_path(), None);
        workspace.manifest_id = Some(entry.id().to_string());
        workspace
    }

    /// The same workspace at a new location. Identity (manifest id) carries over.
    pub fn relocated(self, path: impl Into<PathBuf>) -> Self {
        let mut moved = Self {
            path: path.into(),
            ..self
        };
        moved.touch();
        moved
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest_id(&self) -> Option<&str> {
        self.manifest_id.as_deref()
    }

    pub(crate) fn set_manifest_id(&mut self, id: String) {
        self.manifest_id = Some(id);
    }

    pub fn last_change(&self) -> Timestamp {
        self.last_change
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn editors(&self) -> &[EditorRecord] {
        &self.editors
    }

    pub fn editor(&self, file: &str) -> Option<&EditorRecord> {
        self.editors.iter().find(|e| e.file() == file)
    }

    fn editor_index(&self, file: &str) -> WorkspaceResult<usize> {
        self.editors
            .iter()
            .position(|e| e.file() == file)
            .ok_or_else(|| WorkspaceError::EditorNotFound(file.to_string()))
    }

    /// Open a file as a new editor
    pub fn open_editor(
        &mut self,
        file: impl Into<String>,
        name: impl Into<String>,
        content: &str,
    ) -> WorkspaceResult<&EditorRecord> {
        let file = file.into();
        if self.editor(&file).is_some() {
            return Err(WorkspaceError::DuplicateEditor(file));
        }

        self.editors.push(EditorRecord::open(file, name, content));
        self.touch();
        Ok(&self.editors[self.editors.len() - 1])
    }

    /// Replace an editor's content. Returns false for an identical no-op.
    pub fn mutate_editor(&mut self, file: &str, content: &str) -> WorkspaceResult<bool> {
        let idx = self.editor_index(file)?;
        let changed = self.editors[idx].mutate(content);
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    /// Record an editor as saved. Returns false if it was already clean.
    pub fn mark_saved(&mut self, file: &str) -> WorkspaceResult<bool> {
        let idx = self.editor_index(file)?;
        Ok(self.editors[idx].mark_saved())
    }

    /// Remove an editor. With `CloseMode::Clean` an unsaved editor is refused.
    pub fn close_editor(&mut self, file: &str, mode: CloseMode) -> WorkspaceResult<EditorRecord> {
        let idx = self.editor_index(file)?;
        let editor = &mut self.editors[idx];

        match mode {
            CloseMode::Clean if editor.has_pending_changes() => {
                return Err(WorkspaceError::UnsavedChanges(vec![file.to_string()]));
            }
            CloseMode::Saved => {
                editor.mark_saved();
            }
            _ => {}
        }

        let removed = self.editors.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Merge a partial configuration change. Returns true if anything changed.
    pub fn set_configuration(&mut self, update: ConfigUpdate) -> bool {
        let changed = self.config.apply(update);
        if changed {
            self.touch();
        }
        changed
    }

    /// Change the display name. The path is not affected.
    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.name {
            return false;
        }
        self.name = name;
        self.touch();
        true
    }

    pub fn has_pending_changes(&self) -> bool {
        self.editors.iter().any(EditorRecord::has_pending_changes)
    }

    /// Files with unsaved changes, in editor order
    pub fn pending_files(&self) -> Vec<String> {
        self.editors
            .iter()
            .filter(|e| e.has_pending_changes())
            .map(|e| e.file().to_string())
            .collect()
    }

    /// Check the workspace may be left under `mode`, marking editors saved for
    /// `CloseMode::Saved`
    pub fn release(&mut self, mode: CloseMode) -> WorkspaceResult<()> {
        match mode {
            CloseMode::Clean => {
                let pending = self.pending_files();
                if !pending.is_empty() {
                    return Err(WorkspaceError::UnsavedChanges(pending));
                }
            }
            CloseMode::Saved => {
                for editor in &mut self.editors {
                    editor.mark_saved();
                }
            }
            CloseMode::Discard => {}
        }
        Ok(())
    }

    fn touch(&mut self) {
        let floor = self
            .editors
            .iter()
            .map(EditorRecord::changed)
            .fold(self.last_change, std::cmp::max);
        self.last_change = time::not_before(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Flavor;

    fn workspace() -> WorkspaceState {
        WorkspaceState::create("Notes", "/tmp/notes", None)
    }

    #[test]
    fn test_create_seeds_default_editor() {
        let ws = workspace();
        assert_eq!(ws.editors().len(), 1);
        assert_eq!(ws.editors()[0].file(), DEFAULT_EDITOR_FILE);
        assert_eq!(ws.editors()[0].name(), DEFAULT_EDITOR_NAME);
        assert_eq!(ws.config(), &WorkspaceConfig::default());
        assert!(ws.manifest_id().is_none());
    }

    #[test]
    fn test_with_editors_skips_seed() {
        let ws = WorkspaceState::with_editors(
            "Notes",
            "/tmp/notes",
            None,
            vec![EditorRecord::open("a.md", "a", "")],
        )
        .unwrap();
        assert_eq!(ws.editors().len(), 1);
        assert_eq!(ws.editors()[0].file(), "a.md");
    }

    #[test]
    fn test_with_editors_rejects_duplicates() {
        let result = WorkspaceState::with_editors(
            "Notes",
            "/tmp/notes",
            None,
            vec![
                EditorRecord::open("a.md", "a", ""),
                EditorRecord::open("a.md", "a again", ""),
            ],
        );
        assert!(matches!(result, Err(WorkspaceError::DuplicateEditor(f)) if f == "a.md"));
    }

    #[test]
    fn test_open_duplicate_editor() {
        let mut ws = workspace();
        ws.open_editor("a.md", "a", "").unwrap();
        let err = ws.open_editor("a.md", "a", "other").unwrap_err();
        assert!(matches!(err, WorkspaceError::DuplicateEditor(_)));
        assert_eq!(ws.editors().len(), 2);
    }

    #[test]
    fn test_mutate_updates_last_change() {
        let mut ws = workspace();
        ws.open_editor("a.md", "a", "x").unwrap();
        assert!(ws.mutate_editor("a.md", "y").unwrap());
        let newest = ws.editors().iter().map(EditorRecord::changed).max().unwrap();
        assert!(ws.last_change() >= newest);
    }

    #[test]
    fn test_mutate_missing_editor() {
        let mut ws = workspace();
        let err = ws.mutate_editor("nope.md", "x").unwrap_err();
        assert!(matches!(err, WorkspaceError::EditorNotFound(_)));
    }

    #[test]
    fn test_close_clean_refuses_unsaved() {
        let mut ws = workspace();
        ws.mutate_editor(DEFAULT_EDITOR_FILE, "draft").unwrap();
        let err = ws.close_editor(DEFAULT_EDITOR_FILE, CloseMode::Clean).unwrap_err();
        assert!(matches!(err, WorkspaceError::UnsavedChanges(_)));
        assert_eq!(ws.editors().len(), 1);
    }

    #[test]
    fn test_close_discard_and_saved() {
        let mut ws = workspace();
        ws.open_editor("b.md", "b", "").unwrap();
        ws.mutate_editor(DEFAULT_EDITOR_FILE, "draft").unwrap();
        ws.mutate_editor("b.md", "draft").unwrap();

        let dropped = ws.close_editor(DEFAULT_EDITOR_FILE, CloseMode::Discard).unwrap();
        assert!(dropped.has_pending_changes());

        let saved = ws.close_editor("b.md", CloseMode::Saved).unwrap();
        assert!(!saved.has_pending_changes());
        assert_eq!(saved.content(), "draft");
        assert!(ws.editors().is_empty());
    }

    #[test]
    fn test_set_configuration_touches_last_change() {
        let mut ws = workspace();
        let before = ws.last_change();
        assert!(ws.set_configuration(ConfigUpdate::new().flavor(Flavor::GitHub)));
        assert_eq!(ws.config().flavor, Flavor::GitHub);
        assert!(ws.last_change() >= before);
        assert!(!ws.set_configuration(ConfigUpdate::new().flavor(Flavor::GitHub)));
    }

    #[test]
    fn test_relocated_keeps_identity() {
        let mut ws = workspace();
        ws.set_manifest_id("abc".to_string());
        ws.mutate_editor(DEFAULT_EDITOR_FILE, "kept").unwrap();

        let moved = ws.relocated("/tmp/elsewhere");
        assert_eq!(moved.path(), Path::new("/tmp/elsewhere"));
        assert_eq!(moved.manifest_id(), Some("abc"));
        assert_eq!(moved.editors()[0].content(), "kept");
    }

    #[test]
    fn test_release_modes() {
        let mut ws = workspace();
        ws.mutate_editor(DEFAULT_EDITOR_FILE, "draft").unwrap();

        assert!(matches!(
            ws.release(CloseMode::Clean),
            Err(WorkspaceError::UnsavedChanges(files)) if files == vec![DEFAULT_EDITOR_FILE.to_string()]
        ));
        ws.release(CloseMode::Saved).unwrap();
        assert!(!ws.has_pending_changes());
        ws.release(CloseMode::Clean).unwrap();
    }
}
