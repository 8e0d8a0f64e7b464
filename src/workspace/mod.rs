//! Workspace module - the active project and its open editors
//!
//! A workspace is a named, disk-backed folder. Its identity on disk is the
//! path; its durable identity across moves is the manifest id assigned by
//! the synchronizer.

mod config;
mod state;

pub use config::{ConfigUpdate, Flavor, PluginList, RpcConfig, RpcUpdate, WorkspaceConfig};
pub use state::{CloseMode, WorkspaceState, DEFAULT_EDITOR_FILE, DEFAULT_EDITOR_NAME};
