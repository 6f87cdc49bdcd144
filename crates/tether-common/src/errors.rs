use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures inside the content bridge.
///
/// None of these ever reach the content surface. Script and selection
/// failures are logged and absorbed; command and vocabulary errors are
/// returned to the host that issued the call.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("script evaluation failed: {0}")]
    ScriptEvaluation(String),

    #[error("malformed selection payload: {0}")]
    MalformedSelection(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments for {command}: {reason}")]
    InvalidArguments { command: String, reason: String },

    #[error("unknown content capability: {0}")]
    UnknownCapability(String),

    #[error("unknown host permission: {0}")]
    UnknownPermission(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TetherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
