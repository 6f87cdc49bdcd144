//! Deferred script injection across page loads.
//!
//! Every load may wipe whatever globals were injected before, so configured
//! scripts run again at two lifecycle points and the bridge global is
//! re-defined after each of them, since a user script may have replaced it.

use tether_config::schema::ScriptsConfig;
use tracing::debug;

use crate::bridge::MessageBridge;
use crate::host::{evaluate_detached, ScriptEvaluator};
use crate::ipc::isolated_script;

/// Host-configured scripts. The bridge object lives with [`MessageBridge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionState {
    pub main_script: Option<String>,
    pub main_for_main_frame_only: bool,
    pub preload_script: Option<String>,
    pub preload_for_main_frame_only: bool,
}

impl From<&ScriptsConfig> for InjectionState {
    fn from(config: &ScriptsConfig) -> Self {
        Self {
            main_script: config.injected.clone(),
            main_for_main_frame_only: config.injected_for_main_frame_only,
            preload_script: config.before_content_loaded.clone(),
            preload_for_main_frame_only: config.before_content_loaded_for_main_frame_only,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptInjector {
    state: InjectionState,
    javascript_enabled: bool,
}

impl ScriptInjector {
    pub fn new(state: InjectionState, javascript_enabled: bool) -> Self {
        Self {
            state,
            javascript_enabled,
        }
    }

    pub fn from_config(config: &ScriptsConfig) -> Self {
        Self::new(InjectionState::from(config), config.javascript_enabled)
    }

    pub fn state(&self) -> &InjectionState {
        &self.state
    }

    pub fn set_javascript_enabled(&mut self, enabled: bool) {
        self.javascript_enabled = enabled;
    }

    pub fn set_main_script(&mut self, script: Option<String>) {
        self.state.main_script = script;
    }

    pub fn set_preload_script(&mut self, script: Option<String>) {
        self.state.preload_script = script;
    }

    /// Android's engine only injects into the main frame; the flags are
    /// stored so hosts that can honour them (wry) read them back.
    pub fn set_main_for_main_frame_only(&mut self, value: bool) {
        self.state.main_for_main_frame_only = value;
    }

    pub fn set_preload_for_main_frame_only(&mut self, value: bool) {
        self.state.preload_for_main_frame_only = value;
    }

    /// Navigation started. Returns whether anything ran.
    pub fn on_before_content_loaded(
        &self,
        bridge: &MessageBridge,
        evaluator: &dyn ScriptEvaluator,
    ) -> bool {
        self.run(self.state.preload_script.as_deref(), bridge, evaluator)
    }

    /// Main document loaded. Returns whether anything ran.
    pub fn on_content_loaded(&self, bridge: &MessageBridge, evaluator: &dyn ScriptEvaluator) -> bool {
        self.run(self.state.main_script.as_deref(), bridge, evaluator)
    }

    fn run(
        &self,
        script: Option<&str>,
        bridge: &MessageBridge,
        evaluator: &dyn ScriptEvaluator,
    ) -> bool {
        if !self.javascript_enabled {
            return false;
        }
        let Some(body) = script.filter(|s| !s.trim().is_empty()) else {
            return false;
        };
        debug!(script_len = body.len(), "injecting user script");
        evaluate_detached(evaluator, &isolated_script(body));
        bridge.inject_bridge_global(evaluator);
        true
    }
}
