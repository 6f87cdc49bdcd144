//! Custom text-selection menu.

use serde::Deserialize;
use tether_common::BridgeError;
use tether_config::schema::MenuItemConfig;
use tracing::debug;

/// Evaluated by the host when a menu item is tapped. Its JSON result goes
/// back to [`ContentSurface::on_custom_menu_item`](crate::ContentSurface::on_custom_menu_item).
pub const SELECTION_SCRIPT: &str =
    "(function(){return {selection: window.getSelection().toString()} })()";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub key: String,
}

impl From<MenuItemConfig> for MenuItem {
    fn from(item: MenuItemConfig) -> Self {
        Self {
            label: item.label,
            key: item.key,
        }
    }
}

#[derive(Deserialize)]
struct SelectionResult {
    selection: String,
}

/// Pull the selected text out of the selection script's result.
///
/// Some engines hand back the JSON re-encoded as a string literal, so one
/// level of string wrapping is unwrapped first.
pub fn parse_selection(raw: &str) -> Result<String, BridgeError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| BridgeError::MalformedSelection(e.to_string()))?;
    let value = match value {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| BridgeError::MalformedSelection(e.to_string()))?,
        other => other,
    };
    serde_json::from_value::<SelectionResult>(value)
        .map(|r| r.selection)
        .map_err(|e| BridgeError::MalformedSelection(e.to_string()))
}

/// [`parse_selection`], degrading to an empty string.
pub fn selected_text_or_empty(raw: &str) -> String {
    parse_selection(raw).unwrap_or_else(|e| {
        debug!(error = %e, "unreadable selection result");
        String::new()
    })
}
