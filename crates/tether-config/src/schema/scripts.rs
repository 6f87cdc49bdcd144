//! User script injection configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Platform-level script execution switch. When false nothing is injected.
    pub javascript_enabled: bool,
    /// Runs once the main document has loaded.
    pub injected: Option<String>,
    pub injected_for_main_frame_only: bool,
    /// Runs when a navigation starts, before page scripts.
    pub before_content_loaded: Option<String>,
    pub before_content_loaded_for_main_frame_only: bool,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            injected: None,
            injected_for_main_frame_only: true,
            before_content_loaded: None,
            before_content_loaded_for_main_frame_only: true,
        }
    }
}
