//! The registry of every workspace ever opened, plus which one was last active

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{WorkspaceError, WorkspaceResult};

use super::entry::ManifestEntry;

/// On-disk schema version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatVersion {
    #[default]
    V001,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestRegistry {
    format: FormatVersion,
    #[serde(default)]
    last_opened: Option<String>,
    #[serde(default, with = "entry_list")]
    workspaces: BTreeMap<String, ManifestEntry>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&self) -> FormatVersion {
        self.format
    }

    pub fn last_opened_id(&self) -> Option<&str> {
        self.last_opened.as_deref()
    }

    /// The most recently activated workspace
    pub fn last_opened(&self) -> Option<&ManifestEntry> {
        self.last_opened.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&ManifestEntry> {
        self.workspaces.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ManifestEntry> {
        self.workspaces.get_mut(id)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&ManifestEntry> {
        self.workspaces.values().find(|e| e.disk_path() == path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.workspaces.values()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Entries ordered by last access, most recent first
    pub fn recent(&self) -> Vec<&ManifestEntry> {
        let mut entries: Vec<_> = self.workspaces.values().collect();
        entries.sort_by(|a, b| b.last_accessed().cmp(&a.last_accessed()));
        entries
    }

    pub(crate) fn insert(&mut self, entry: ManifestEntry) {
        self.workspaces.insert(entry.id().to_string(), entry);
    }

    pub(crate) fn set_last_opened(&mut self, id: &str) {
        self.last_opened = Some(id.to_string());
    }

    /// Point an entry at a new location, keeping its id
    pub fn relocate_entry(&mut self, id: &str, path: &Path) -> WorkspaceResult<bool> {
        let entry = self
            .workspaces
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::EntryNotFound(id.to_string()))?;
        Ok(entry.set_disk_path(path))
    }

    /// Forget a workspace. Clears `last-opened` if it pointed here.
    pub fn remove_entry(&mut self, id: &str) -> WorkspaceResult<ManifestEntry> {
        let entry = self
            .workspaces
            .remove(id)
            .ok_or_else(|| WorkspaceError::EntryNotFound(id.to_string()))?;
        if self.last_opened.as_deref() == Some(id) {
            self.last_opened = None;
        }
        Ok(entry)
    }

    /// Drop a dangling `last-opened` reference left by a hand-edited file
    pub(crate) fn repair(&mut self) -> bool {
        match &self.last_opened {
            Some(id) if !self.workspaces.contains_key(id) => {
                self.last_opened = None;
                true
            }
            _ => false,
        }
    }
}

/// Entries are keyed by id in memory and stored as a list on disk
mod entry_list {
    use super::ManifestEntry;
    use serde::de::Error;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, ManifestEntry>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(map.len()))?;
        for entry in map.values() {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, ManifestEntry>, D::Error> {
        let list = Vec::<ManifestEntry>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for entry in list {
            let id = entry.id().to_string();
            if map.insert(id.clone(), entry).is_some() {
                return Err(D::Error::custom(format!("duplicate workspace id: {}", id)));
            }
        }
        Ok(map)
    }
}
