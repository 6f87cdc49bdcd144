//! Configuration schema types for Tether.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults a host would expect from a
//! freshly constructed content surface.

mod bridge;
mod events;
mod permissions;
mod scripts;
mod system;

pub use bridge::*;
pub use events::*;
pub use permissions::*;
pub use scripts::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for one content surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub bridge: BridgeConfig,
    pub scripts: ScriptsConfig,
    pub permissions: PermissionsConfig,
    pub events: EventsConfig,
    pub logging: LoggingConfig,
}
