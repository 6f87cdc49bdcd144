//! Host-side collaborators a content surface talks to.
//!
//! The surface never owns a rendering engine. Everything it needs from the
//! outside world (running script, asking the OS for permissions, delivering
//! events, navigating) goes through these traits, so the core can run on
//! top of a native webview, a test double, or the headless replay driver.

use serde_json::{Map, Value};
use tether_common::BridgeError;
use tracing::debug;

use crate::permissions::HostPermissionId;

/// Flat key/value payload handed to the generic event callback.
pub type EventPayload = Map<String, Value>;

/// Script-evaluation primitive.
///
/// Fire-and-forget: the result of the script is never read back. An `Err`
/// only means the engine refused the script outright.
pub trait ScriptEvaluator {
    fn evaluate(&self, script: &str) -> Result<(), BridgeError>;
}

/// Evaluate a script and absorb any failure.
pub(crate) fn evaluate_detached(evaluator: &dyn ScriptEvaluator, script: &str) {
    if let Err(e) = evaluator.evaluate(script) {
        debug!(error = %e, script_len = script.len(), "script evaluation failed");
    }
}

/// OS permission subsystem.
pub trait PermissionHost {
    /// Whether the OS already granted `permission` to the host process.
    fn is_granted(&self, permission: HostPermissionId) -> bool;

    /// Show one OS dialog for the whole batch.
    ///
    /// The answer comes back later through
    /// [`ContentSurface::on_permission_result`](crate::ContentSurface::on_permission_result).
    fn show_prompt(&mut self, permissions: &[HostPermissionId]);
}

/// Generic event callback.
pub trait EventSink {
    fn on_event(&self, payload: EventPayload);
}

/// Direct-call delivery target for content messages.
///
/// Receives `{ "nativeEvent": <payload>, "messagingModuleName": <name> }`.
pub trait MessagingModule {
    fn on_message(&self, event: Value);
}

/// Platform feature detection used once, when the bridge is first enabled.
pub trait FeatureProbe {
    /// True when the engine offers a structured postMessage listener API.
    fn supports_message_listener(&self) -> bool;
}

/// Navigation primitives behind host commands.
pub trait Navigator {
    fn load_url(&mut self, url: &str) -> Result<(), BridgeError>;
    fn go_back(&mut self) -> Result<(), BridgeError>;
    fn go_forward(&mut self) -> Result<(), BridgeError>;
    fn reload(&mut self) -> Result<(), BridgeError>;
    fn stop_loading(&mut self) -> Result<(), BridgeError>;

    fn request_focus(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn clear_form_data(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn clear_cache(&mut self, _include_disk_files: bool) -> Result<(), BridgeError> {
        Ok(())
    }

    fn clear_history(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// Everything a [`ContentSurface`](crate::ContentSurface) needs from its host.
pub struct HostBindings {
    pub scripts: Box<dyn ScriptEvaluator>,
    pub permissions: Box<dyn PermissionHost>,
    pub navigator: Box<dyn Navigator>,
    pub events: Box<dyn EventSink>,
    pub messaging_module: Option<Box<dyn MessagingModule>>,
    pub features: Box<dyn FeatureProbe>,
}
