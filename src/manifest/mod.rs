//! Workspace manifest - the durable catalog of known workspaces
//!
//! On-disk shape:
//! ```text
//! {
//!   "format": "V001",
//!   "last-opened": "<id>",
//!   "workspaces": [
//!     { "id": "...", "display-name": "...", "disk-path": "...", "last-accessed": "<ISO-8601>" }
//!   ]
//! }
//! ```

mod entry;
mod registry;
mod store;

pub use entry::ManifestEntry;
pub use registry::{FormatVersion, ManifestRegistry};
pub use store::{default_manifest_path, JsonFileStore, ManifestStore, MemoryStore};
