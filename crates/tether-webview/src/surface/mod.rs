//! One embedded content surface and everything attached to it.
//!
//! `ContentSurface` owns the bridge, the injector, the progress gate, the
//! permission reconciler and the dispatcher, and is the only object a host
//! talks to. Every method except [`ContentSurface::poster`] must be called
//! from the UI context that created the surface.


use serde_json::Value;
use tether_common::{BridgeError, SurfaceId};
use tether_config::schema::{MenuItemConfig, TetherConfig};
use tracing::{debug, info, warn};

use crate::bridge::{BridgePoster, MessageBridge, TransportMode};
use crate::commands::SurfaceCommand;
use crate::dispatcher::EventDispatcher;
use crate::events::{HostEvent, NavigationSnapshot, PageLoadState};
use crate::host::{
    evaluate_detached, FeatureProbe, HostBindings, Navigator, PermissionHost, ScriptEvaluator,
};
use crate::injector::ScriptInjector;
use crate::ipc::content_message_script;
use crate::permissions::{
    Admission, CaptureResponder, ContentCapability, GeolocationCallback, HostPermissionId,
    PermissionReconciler,
};
use crate::progress::ProgressGate;
use crate::selection::{selected_text_or_empty, MenuItem};

pub struct ContentSurface {
    id: SurfaceId,
    bridge: MessageBridge,
    injector: ScriptInjector,
    gate: ProgressGate,
    permissions: PermissionReconciler,
    dispatcher: EventDispatcher,
    scripts: Box<dyn ScriptEvaluator>,
    os: Box<dyn PermissionHost>,
    navigator: Box<dyn Navigator>,
    features: Box<dyn FeatureProbe>,
    navigation: NavigationSnapshot,
    menu_items: Vec<MenuItem>,
    send_content_size_changes: bool,
    has_on_open_window_event: bool,
    torn_down: bool,
}

impl ContentSurface {
    pub fn new(config: &TetherConfig, bindings: HostBindings) -> Self {
        let HostBindings {
            scripts,
            permissions,
            navigator,
            events,
            messaging_module,
            features,
        } = bindings;

        let bridge = MessageBridge::new(
            config.bridge.global_name.clone(),
            config.scripts.javascript_enabled,
        )
        .with_injected_object(config.bridge.injected_object.clone());

        let mut surface = Self {
            id: SurfaceId::new(),
            bridge,
            injector: ScriptInjector::from_config(&config.scripts),
            gate: ProgressGate::new(),
            permissions: PermissionReconciler::from_config(&config.permissions),
            dispatcher: EventDispatcher::new(
                events,
                messaging_module,
                config.bridge.messaging_module_name.clone(),
            ),
            scripts,
            os: permissions,
            navigator,
            features,
            navigation: NavigationSnapshot::default(),
            menu_items: config
                .events
                .menu_custom_items
                .iter()
                .cloned()
                .map(MenuItem::from)
                .collect(),
            send_content_size_changes: config.events.send_content_size_changes,
            has_on_open_window_event: config.events.has_on_open_window_event,
            torn_down: false,
        };
        info!(surface = %surface.id, global = %config.bridge.global_name, "content surface created");

        if config.bridge.messaging_enabled {
            surface.set_messaging_enabled(true);
        }
        surface
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn transport(&self) -> Option<TransportMode> {
        self.bridge.transport()
    }

    pub fn is_messaging_enabled(&self) -> bool {
        self.bridge.is_enabled()
    }

    pub fn navigation(&self) -> &NavigationSnapshot {
        &self.navigation
    }

    pub fn permissions(&self) -> &PermissionReconciler {
        &self.permissions
    }

    pub fn progress_gate(&self) -> &ProgressGate {
        &self.gate
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    // -- messaging --

    /// The first enable picks the transport and injects the bridge global.
    pub fn set_messaging_enabled(&mut self, enabled: bool) -> Option<TransportMode> {
        if self.torn_down {
            return None;
        }
        if enabled {
            let mode = self.bridge.enable(&*self.features, &*self.scripts);
            debug!(surface = %self.id, ?mode, "messaging enabled");
            Some(mode)
        } else {
            self.bridge.disable();
            debug!(surface = %self.id, "messaging disabled");
            self.bridge.transport()
        }
    }

    /// Handle for delivering page messages from any thread.
    pub fn poster(&self) -> BridgePoster {
        self.bridge.poster()
    }

    /// Deliver everything posted since the last pump. Returns how many
    /// messages went out.
    pub fn pump(&mut self) -> usize {
        let envelopes = self.bridge.drain();
        let count = envelopes.len();
        for envelope in envelopes {
            debug!(
                surface = %self.id,
                origin = %envelope.source_origin,
                len = envelope.payload.len(),
                "delivering content message"
            );
            self.dispatcher.dispatch(&HostEvent::Message {
                envelope,
                navigation: self.navigation.clone(),
            });
        }
        count
    }

    pub fn set_messaging_module_name(&mut self, name: Option<String>) {
        self.dispatcher.set_module_name(name);
    }

    pub fn set_injected_object(&mut self, json: Option<String>) {
        self.bridge.set_injected_object(json, &*self.scripts);
    }

    // -- page lifecycle --

    pub fn on_page_load(&mut self, state: PageLoadState, url: &str) {
        debug!(surface = %self.id, ?state, url = %url, "page load");
        self.navigation.url = url.to_string();
        match state {
            PageLoadState::Started => {
                self.navigation.loading = true;
                self.gate.set_suppressing(false);
                self.permissions.forget_denials();
                self.injector
                    .on_before_content_loaded(&self.bridge, &*self.scripts);
            }
            PageLoadState::Finished => {
                self.navigation.loading = false;
                self.injector.on_content_loaded(&self.bridge, &*self.scripts);
            }
        }
    }

    /// Load progress from the engine, `0..=100`. Returns whether an event
    /// was dispatched.
    pub fn on_progress_changed(&mut self, progress: u8, navigation: NavigationSnapshot) -> bool {
        self.navigation = navigation;
        if !self.gate.admit() {
            return false;
        }
        self.dispatcher.dispatch(&HostEvent::LoadProgress {
            navigation: self.navigation.clone(),
            progress: f64::from(progress.min(100)) / 100.0,
        });
        true
    }

    /// Arm or clear the gate directly, for navigation the host starts
    /// without going through [`SurfaceCommand::LoadUrl`].
    pub fn set_suppressing_progress(&mut self, suppressing: bool) {
        self.gate.set_suppressing(suppressing);
    }

    // -- permissions --

    pub fn on_permission_request(
        &mut self,
        capabilities: impl IntoIterator<Item = ContentCapability>,
        responder: CaptureResponder,
    ) -> Admission {
        if self.torn_down {
            debug!(surface = %self.id, "permission request after teardown dropped");
            return Admission::Answered;
        }
        let admission =
            self.permissions
                .on_permission_request(&mut *self.os, capabilities, responder);
        if let Admission::Prompted(ids) = &admission {
            self.announce_prompt(ids.clone());
        }
        admission
    }

    pub fn on_geolocation_prompt(
        &mut self,
        origin: impl Into<String>,
        callback: GeolocationCallback,
    ) -> Admission {
        if self.torn_down {
            debug!(surface = %self.id, "geolocation prompt after teardown dropped");
            return Admission::Answered;
        }
        let admission = self
            .permissions
            .on_geolocation_prompt(&mut *self.os, origin, callback);
        if let Admission::Prompted(ids) = &admission {
            self.announce_prompt(ids.clone());
        }
        admission
    }

    /// Answer from the OS for the prompt currently on screen.
    pub fn on_permission_result(&mut self, results: &[(HostPermissionId, bool)]) {
        if self.torn_down {
            return;
        }
        if let Some(ids) = self.permissions.on_permission_result(&mut *self.os, results) {
            self.announce_prompt(ids);
        }
    }

    pub fn set_allows_protected_media(&mut self, allowed: bool) {
        self.permissions.set_allows_protected_media(allowed);
    }

    fn announce_prompt(&self, permissions: Vec<HostPermissionId>) {
        self.dispatcher
            .dispatch(&HostEvent::PermissionPrompt { permissions });
    }

    // -- optional events --

    pub fn set_send_content_size_changes(&mut self, enabled: bool) {
        self.send_content_size_changes = enabled;
    }

    pub fn on_content_size_changed(&self, width: u32, height: u32) -> bool {
        if !self.send_content_size_changes {
            return false;
        }
        self.dispatcher
            .dispatch(&HostEvent::ContentSizeChange { width, height });
        true
    }

    pub fn set_has_on_open_window_event(&mut self, enabled: bool) {
        self.has_on_open_window_event = enabled;
    }

    /// Returns true when the host took the request. Otherwise the engine
    /// should handle the window itself.
    pub fn on_open_window(&self, target_url: &str) -> bool {
        if !self.has_on_open_window_event {
            return false;
        }
        self.dispatcher.dispatch(&HostEvent::OpenWindow {
            target_url: target_url.to_string(),
        });
        true
    }

    pub fn set_menu_custom_items(&mut self, items: Vec<MenuItemConfig>) {
        self.menu_items = items.into_iter().map(MenuItem::from).collect();
    }

    /// Menu item `index` was tapped and the selection script returned
    /// `selection_json`.
    pub fn on_custom_menu_item(&self, index: usize, selection_json: &str) -> bool {
        let Some(item) = self.menu_items.get(index) else {
            warn!(surface = %self.id, index, "custom menu item out of range");
            return false;
        };
        self.dispatcher.dispatch(&HostEvent::SelectionAction {
            label: item.label.clone(),
            key: item.key.clone(),
            selected_text: selected_text_or_empty(selection_json),
        });
        true
    }

    // -- scripts --

    pub fn set_javascript_enabled(&mut self, enabled: bool) {
        self.bridge.set_javascript_enabled(enabled);
        self.injector.set_javascript_enabled(enabled);
    }

    pub fn set_injected_script(&mut self, script: Option<String>) {
        self.injector.set_main_script(script);
    }

    pub fn set_injected_script_before_content_loaded(&mut self, script: Option<String>) {
        self.injector.set_preload_script(script);
    }

    pub fn set_injected_script_for_main_frame_only(&mut self, value: bool) {
        self.injector.set_main_for_main_frame_only(value);
    }

    pub fn set_injected_script_before_content_loaded_for_main_frame_only(&mut self, value: bool) {
        self.injector.set_preload_for_main_frame_only(value);
    }

    pub fn injector(&self) -> &ScriptInjector {
        &self.injector
    }

    // -- host commands --

    /// Parse and run a named command.
    pub fn receive_named_command(&mut self, name: &str, args: &[Value]) -> Result<(), BridgeError> {
        let command = SurfaceCommand::parse(name, args)?;
        self.receive_command(command)
    }

    pub fn receive_command(&mut self, command: SurfaceCommand) -> Result<(), BridgeError> {
        debug!(surface = %self.id, command = command.name(), "host command");
        match command {
            SurfaceCommand::GoBack => self.navigator.go_back(),
            SurfaceCommand::GoForward => self.navigator.go_forward(),
            SurfaceCommand::Reload => self.navigator.reload(),
            SurfaceCommand::StopLoading => self.navigator.stop_loading(),
            SurfaceCommand::PostMessage(data) => {
                evaluate_detached(&*self.scripts, &content_message_script(&data));
                Ok(())
            }
            SurfaceCommand::InjectJavaScript(script) => {
                evaluate_detached(&*self.scripts, &script);
                Ok(())
            }
            SurfaceCommand::LoadUrl(url) => {
                self.gate.set_suppressing(true);
                self.navigator.load_url(&url)
            }
            SurfaceCommand::RequestFocus => self.navigator.request_focus(),
            SurfaceCommand::ClearFormData => self.navigator.clear_form_data(),
            SurfaceCommand::ClearCache { include_disk_files } => {
                self.navigator.clear_cache(include_disk_files)
            }
            SurfaceCommand::ClearHistory => self.navigator.clear_history(),
        }
    }

    // -- teardown --

    /// Drop outstanding permission callbacks unanswered, clear the pending
    /// queue and stop accepting messages. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.permissions.teardown();
        self.bridge.close();
        info!(surface = %self.id, dropped_progress = self.gate.dropped(), "content surface torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for ContentSurface {
    fn drop(&mut self) {
        self.teardown();
    }
}
