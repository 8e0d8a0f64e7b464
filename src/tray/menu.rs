//! Recent-workspaces menu for the tray
//!
//! Built from the manifest registry; lists the most recently accessed
//! workspaces followed by a quit item. Selecting an item yields a
//! `TrayIntent` that the application routes through its normal workspace
//! operations. The menu itself never touches state.

use crate::manifest::ManifestRegistry;
use crate::util::unicode::truncate_to_width;

/// Widest label shown in the native menu, in columns
pub const LABEL_WIDTH: usize = 40;

const QUIT_ID: &str = "quit";
const WORKSPACE_PREFIX: &str = "workspace:";

/// What the user asked for from the tray
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayIntent {
    OpenWorkspace(String),
    Quit,
}

impl TrayIntent {
    /// Native menu id for this intent
    pub fn menu_id(&self) -> String {
        match self {
            TrayIntent::OpenWorkspace(id) => format!("{}{}", WORKSPACE_PREFIX, id),
            TrayIntent::Quit => QUIT_ID.to_string(),
        }
    }

    /// Parse a native menu id back into an intent
    pub fn from_menu_id(menu_id: &str) -> Option<Self> {
        if menu_id == QUIT_ID {
            return Some(TrayIntent::Quit);
        }
        menu_id
            .strip_prefix(WORKSPACE_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| TrayIntent::OpenWorkspace(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub text: String,
    /// Secondary text (the workspace path), empty for non-workspace items
    pub detail: String,
    /// Marks the last-opened workspace
    pub checked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecentMenu {
    items: Vec<MenuItem>,
}

impl RecentMenu {
    pub fn from_registry(registry: &ManifestRegistry, limit: usize) -> Self {
        let current = registry.last_opened_id();
        let mut items: Vec<MenuItem> = registry
            .recent()
            .into_iter()
            .take(limit)
            .map(|entry| MenuItem {
                id: TrayIntent::OpenWorkspace(entry.id().to_string()).menu_id(),
                text: truncate_to_width(entry.display_name(), LABEL_WIDTH),
                detail: entry.disk_path().to_string_lossy().to_string(),
                checked: current == Some(entry.id()),
            })
            .collect();

        items.push(MenuItem {
            id: TrayIntent::Quit.menu_id(),
            text: "Quit".to_string(),
            detail: String::new(),
            checked: false,
        });

        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of workspace items (excluding quit)
    pub fn workspace_count(&self) -> usize {
        self.items.len() - 1
    }

    /// Resolve a clicked item into an intent
    pub fn select(&self, menu_id: &str) -> Option<TrayIntent> {
        self.items
            .iter()
            .find(|item| item.id == menu_id)
            .and_then(|item| TrayIntent::from_menu_id(&item.id))
    }
}
