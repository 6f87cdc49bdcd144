//! Permission handling configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Grant protected-media (DRM) requests without asking the OS.
    ///
    /// Turning this off does not revoke a grant the current page already
    /// holds; the page has to reload.
    pub allows_protected_media: bool,
    /// When false, geolocation prompts are denied without asking the OS.
    pub geolocation_enabled: bool,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            allows_protected_media: false,
            geolocation_enabled: true,
        }
    }
}
