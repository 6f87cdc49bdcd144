pub mod errors;
pub mod id;

pub use errors::{BridgeError, ConfigError, TetherError};
pub use id::{new_id, SurfaceId};

pub type Result<T> = std::result::Result<T, TetherError>;
