//! Per-workspace configuration

use serde::{Deserialize, Serialize};

/// Markdown dialect a workspace edits against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flavor {
    #[default]
    Default,
    Obsidian,
    GitHub,
}

/// External status reporting (rich presence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RpcConfig {
    pub enable: bool,
    pub show_file_in_status: bool,
    pub show_time_in_status: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            enable: true,
            show_file_in_status: true,
            show_time_in_status: true,
        }
    }
}

/// Plugin identifiers in insertion order, no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PluginList(Vec<String>);

impl PluginList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin. Returns false if it was already present.
    pub fn push(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|p| p == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PluginList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = PluginList::new();
        for id in iter {
            list.push(id);
        }
        list
    }
}

impl From<Vec<String>> for PluginList {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<PluginList> for Vec<String> {
    fn from(list: PluginList) -> Self {
        list.0
    }
}

/// Workspace configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub plugins: PluginList,
    pub flavor: Flavor,
    pub rpc: RpcConfig,
}

/// Partial update to the rpc flags; `None` leaves a flag alone
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcUpdate {
    pub enable: Option<bool>,
    pub show_file_in_status: Option<bool>,
    pub show_time_in_status: Option<bool>,
}

/// Partial configuration change.
///
/// `plugins` replaces the whole list when present; it holds the full desired
/// set, not a delta.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub plugins: Option<PluginList>,
    pub flavor: Option<Flavor>,
    pub rpc: RpcUpdate,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plugins<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.plugins = Some(ids.into_iter().collect());
        self
    }

    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn rpc_enable(mut self, on: bool) -> Self {
        self.rpc.enable = Some(on);
        self
    }

    pub fn rpc_show_file(mut self, on: bool) -> Self {
        self.rpc.show_file_in_status = Some(on);
        self
    }

    pub fn rpc_show_time(mut self, on: bool) -> Self {
        self.rpc.show_time_in_status = Some(on);
        self
    }
}

impl WorkspaceConfig {
    /// Merge an update in. Returns true if anything changed.
    pub fn apply(&mut self, update: ConfigUpdate) -> bool {
        let before = self.clone();

        if let Some(plugins) = update.plugins {
            self.plugins = plugins;
        }
        if let Some(flavor) = update.flavor {
            self.flavor = flavor;
        }
        if let Some(on) = update.rpc.enable {
            self.rpc.enable = on;
        }
        if let Some(on) = update.rpc.show_file_in_status {
            self.rpc.show_file_in_status = on;
        }
        if let Some(on) = update.rpc.show_time_in_status {
            self.rpc.show_time_in_status = on;
        }

        *self != before
    }
}
