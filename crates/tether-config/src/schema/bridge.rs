//! Message bridge configuration.

use serde::{Deserialize, Serialize};

/// Name of the global object exposed to page scripts when none is configured.
pub const DEFAULT_BRIDGE_GLOBAL: &str = "TetherBridge";

/// Content-to-host messaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Enable the bridge when the surface is created.
    pub messaging_enabled: bool,
    /// Global object name page scripts call `postMessage` on.
    pub global_name: String,
    /// When set, messages are delivered through the messaging module
    /// instead of the generic event callback.
    pub messaging_module_name: Option<String>,
    /// JSON returned by the bridge's `injectedObjectJson()` accessor.
    pub injected_object: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            messaging_enabled: false,
            global_name: DEFAULT_BRIDGE_GLOBAL.to_string(),
            messaging_module_name: None,
            injected_object: None,
        }
    }
}
