//! Message bridge between embedded web content and its host.
//!
//! Provides:
//! - A content-to-host message channel with a once-per-surface transport choice
//! - Script injection that survives reloads and clobbered globals
//! - Serialized OS permission prompts for page capability requests
//! - A progress gate separating host-issued navigation from page navigation
//! - Event delivery through a messaging module or a generic callback
//!
//! [`ContentSurface`] ties these together behind the host traits in [`host`].

pub mod bridge;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod host;
pub mod injector;
pub mod ipc;
pub mod permissions;
pub mod progress;
pub mod selection;
pub mod surface;

#[cfg(feature = "wry")]
pub mod wry_host;

pub use bridge::{BridgePoster, MessageBridge, TransportMode};
pub use commands::SurfaceCommand;
pub use dispatcher::{DeliveryPath, EventDispatcher};
pub use events::{HostEvent, NavigationSnapshot, PageLoadState};
pub use host::{
    EventPayload, EventSink, FeatureProbe, HostBindings, MessagingModule, Navigator,
    PermissionHost, ScriptEvaluator,
};
pub use injector::{InjectionState, ScriptInjector};
pub use ipc::MessageEnvelope;
pub use permissions::{
    Admission, CaptureResponder, ContentCapability, GeolocationCallback, HostPermissionId,
    PermissionReconciler, SlotPhase,
};
pub use progress::ProgressGate;
pub use selection::{MenuItem, SELECTION_SCRIPT};
pub use surface::ContentSurface;
