use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::util::time::{self, Timestamp};

/// Durable record of one known workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestEntry {
    id: String,
    display_name: String,
    disk_path: PathBuf,
    last_accessed: Timestamp,
}

impl ManifestEntry {
    /// Create an entry with a freshly minted id
    pub fn new(display_name: impl Into<String>, disk_path: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
            disk_path: disk_path.into(),
            last_accessed: time::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }

    pub fn last_accessed(&self) -> Timestamp {
        self.last_accessed
    }

    /// Record an access; always strictly later than the previous one
    pub(crate) fn touch(&mut self) {
        self.last_accessed = time::after(self.last_accessed);
    }

    pub(crate) fn set_display_name(&mut self, name: &str) -> bool {
        if self.display_name == name {
            return false;
        }
        self.display_name = name.to_string();
        true
    }

    /// Point the entry at a new location. The id is unchanged.
    pub(crate) fn set_disk_path(&mut self, path: &Path) -> bool {
        if self.disk_path == path {
            return false;
        }
        self.disk_path = path.to_path_buf();
        true
    }

    /// Whether the disk path currently resolves to a directory
    pub fn resolves(&self) -> bool {
        self.disk_path.is_dir()
    }
}
