mod menu;

pub use menu::{MenuItem, RecentMenu, TrayIntent, LABEL_WIDTH};
