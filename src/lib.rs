//! Workspace, editor and manifest state for the Noot markdown editor
//!
//! Tracks the active workspace, the editors open in it, and a durable
//! registry of every workspace ever opened so a session can be restored.

pub mod app;
pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod logging;
pub mod manifest;
pub mod sync;
pub mod tray;
pub mod util;
pub mod workspace;

pub use app::{AppContext, Flow, Startup};
pub use error::{PersistenceError, WorkspaceError, WorkspaceResult};
