//! Content-to-host message channel.
//!
//! The platform delivers page messages either through a structured
//! postMessage listener or through an interface object whose method the
//! page calls directly. The second path runs on whatever thread the script
//! engine picked, so every inbound message is pushed onto a channel and only
//! turned into host events when the UI context drains it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::host::{evaluate_detached, FeatureProbe, ScriptEvaluator};
use crate::ipc::{bridge_global_script, MessageEnvelope};

/// How page messages reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    /// The engine's structured postMessage listener, registered under the
    /// bridge global name.
    ListenerBased,
    /// A named global interface object exposing `postMessage(string)`.
    InterfaceFallback,
}

impl TransportMode {
    pub fn select(probe: &dyn FeatureProbe) -> Self {
        if probe.supports_message_listener() {
            Self::ListenerBased
        } else {
            Self::InterfaceFallback
        }
    }
}

/// Thread-safe entry point for inbound messages.
///
/// Clone it into whatever callback the platform invokes for
/// `postMessage`; the clones all feed the same bridge.
#[derive(Debug, Clone)]
pub struct BridgePoster {
    tx: mpsc::UnboundedSender<MessageEnvelope>,
    enabled: Arc<AtomicBool>,
}

impl BridgePoster {
    /// Queue a message for the UI context. Returns false when it was dropped
    /// because messaging is disabled or the surface is gone.
    pub fn post(&self, raw: impl Into<String>, origin: impl Into<String>) -> bool {
        if !self.enabled.load(Ordering::Acquire) {
            warn!("postMessage called while messaging is disabled; message dropped");
            return false;
        }
        self.tx.send(MessageEnvelope::new(raw, origin)).is_ok()
    }
}

pub struct MessageBridge {
    global_name: String,
    javascript_enabled: bool,
    transport: Option<TransportMode>,
    enabled: Arc<AtomicBool>,
    injected_object: Option<String>,
    tx: mpsc::UnboundedSender<MessageEnvelope>,
    rx: mpsc::UnboundedReceiver<MessageEnvelope>,
}

impl MessageBridge {
    pub fn new(global_name: impl Into<String>, javascript_enabled: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            global_name: global_name.into(),
            javascript_enabled,
            transport: None,
            enabled: Arc::new(AtomicBool::new(false)),
            injected_object: None,
            tx,
            rx,
        }
    }

    /// Preset the bridge object without touching the page.
    pub fn with_injected_object(mut self, json: Option<String>) -> Self {
        self.injected_object = json;
        self
    }

    pub fn global_name(&self) -> &str {
        &self.global_name
    }

    /// Transport chosen on first enable; `None` until then.
    pub fn transport(&self) -> Option<TransportMode> {
        self.transport
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn injected_object(&self) -> Option<&str> {
        self.injected_object.as_deref()
    }

    pub fn set_javascript_enabled(&mut self, enabled: bool) {
        self.javascript_enabled = enabled;
    }

    /// Turn messaging on. The transport is probed only the first time; later
    /// enables reuse it for the lifetime of this bridge.
    pub fn enable(
        &mut self,
        probe: &dyn FeatureProbe,
        evaluator: &dyn ScriptEvaluator,
    ) -> TransportMode {
        let mode = match self.transport {
            Some(mode) => mode,
            None => {
                let mode = TransportMode::select(probe);
                info!(global = %self.global_name, ?mode, "bridge transport selected");
                self.transport = Some(mode);
                mode
            }
        };
        self.enabled.store(true, Ordering::Release);
        self.inject_bridge_global(evaluator);
        mode
    }

    pub fn disable(&mut self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Handle for callers on other threads.
    pub fn poster(&self) -> BridgePoster {
        BridgePoster {
            tx: self.tx.clone(),
            enabled: Arc::clone(&self.enabled),
        }
    }

    /// Inbound message from the page. Safe from any thread via [`poster`];
    /// this form is for callers already holding the bridge.
    ///
    /// [`poster`]: Self::poster
    pub fn on_inbound_message(&self, raw: impl Into<String>, origin: impl Into<String>) -> bool {
        self.poster().post(raw, origin)
    }

    /// Take every envelope queued since the last drain, in arrival order.
    pub fn drain(&mut self) -> Vec<MessageEnvelope> {
        let mut out = Vec::new();
        while let Ok(envelope) = self.rx.try_recv() {
            out.push(envelope);
        }
        out
    }

    /// (Re)define the bridge global in the page.
    ///
    /// Overwrites rather than appends, so running it after every load or
    /// after a page script clobbered the global is harmless.
    pub fn inject_bridge_global(&self, evaluator: &dyn ScriptEvaluator) {
        if !self.javascript_enabled {
            return;
        }
        let script = bridge_global_script(&self.global_name, self.injected_object.as_deref());
        evaluate_detached(evaluator, &script);
    }

    pub fn set_injected_object(
        &mut self,
        json: Option<String>,
        evaluator: &dyn ScriptEvaluator,
    ) {
        self.injected_object = json;
        self.inject_bridge_global(evaluator);
    }

    /// Stop accepting messages and discard anything still queued.
    pub fn close(&mut self) {
        self.disable();
        let dropped = self.drain().len();
        if dropped > 0 {
            debug!(dropped, "discarded undelivered messages on close");
        }
    }
}
