//! Routes host-bound events to whichever delivery target is configured.

use serde_json::{json, Value};
use tracing::trace;

use crate::events::HostEvent;
use crate::host::{EventSink, MessagingModule};

/// Which path a content message takes to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPath {
    /// Wrapped and handed to the messaging module directly.
    MessagingModule,
    /// Flat payload through the generic event callback.
    Generic,
}

pub struct EventDispatcher {
    sink: Box<dyn EventSink>,
    module: Option<Box<dyn MessagingModule>>,
    module_name: Option<String>,
}

impl EventDispatcher {
    pub fn new(
        sink: Box<dyn EventSink>,
        module: Option<Box<dyn MessagingModule>>,
        module_name: Option<String>,
    ) -> Self {
        Self {
            sink,
            module,
            module_name,
        }
    }

    pub fn set_module_name(&mut self, name: Option<String>) {
        self.module_name = name;
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Path content messages take right now. Both a module and a name are
    /// needed for the direct path.
    pub fn delivery_path(&self) -> DeliveryPath {
        match self.direct_target() {
            Some(_) => DeliveryPath::MessagingModule,
            None => DeliveryPath::Generic,
        }
    }

    /// Deliver one event synchronously.
    pub fn dispatch(&self, event: &HostEvent) {
        let payload = event.to_payload();
        trace!(kind = event.kind(), "dispatching host event");

        if let HostEvent::Message { .. } = event {
            if let Some((module, name)) = self.direct_target() {
                module.on_message(json!({
                    "nativeEvent": Value::Object(payload),
                    "messagingModuleName": name,
                }));
                return;
            }
        }
        self.sink.on_event(payload);
    }

    fn direct_target(&self) -> Option<(&dyn MessagingModule, &str)> {
        match (self.module.as_deref(), self.module_name.as_deref()) {
            (Some(module), Some(name)) if !name.is_empty() => Some((module, name)),
            _ => None,
        }
    }
}
