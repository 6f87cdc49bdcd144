//! Outbound event configuration.

use serde::{Deserialize, Serialize};

/// One entry of the custom text-selection menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemConfig {
    pub label: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub send_content_size_changes: bool,
    pub has_on_open_window_event: bool,
    /// Replaces the platform selection menu when non-empty.
    pub menu_custom_items: Vec<MenuItemConfig>,
}
