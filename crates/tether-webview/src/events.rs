//! Events a content surface reports to its host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::EventPayload;
use crate::ipc::MessageEnvelope;
use crate::permissions::HostPermissionId;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Main document finished loading.
    Finished,
}

#[cfg(feature = "wry")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Navigation state attached to message and progress events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationSnapshot {
    pub url: String,
    pub title: String,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Host-bound event.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A page called `postMessage`.
    Message {
        envelope: MessageEnvelope,
        navigation: NavigationSnapshot,
    },
    /// Load progress, as a fraction in `0.0..=1.0`.
    LoadProgress {
        navigation: NavigationSnapshot,
        progress: f64,
    },
    /// A custom text-selection menu item was tapped.
    SelectionAction {
        label: String,
        key: String,
        selected_text: String,
    },
    ContentSizeChange {
        width: u32,
        height: u32,
    },
    /// The page tried to open a new window.
    OpenWindow {
        target_url: String,
    },
    /// An OS permission dialog was put on screen.
    PermissionPrompt {
        permissions: Vec<HostPermissionId>,
    },
}

impl HostEvent {
    /// Name carried in the payload's `type` key.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::LoadProgress { .. } => "loadingProgress",
            Self::SelectionAction { .. } => "customMenuSelection",
            Self::ContentSizeChange { .. } => "contentSizeChange",
            Self::OpenWindow { .. } => "openWindow",
            Self::PermissionPrompt { .. } => "permissionPrompt",
        }
    }

    /// Flatten into the key/value shape the generic event callback takes.
    pub fn to_payload(&self) -> EventPayload {
        let mut map = EventPayload::new();
        map.insert("type".into(), Value::from(self.kind()));
        match self {
            Self::Message {
                envelope,
                navigation,
            } => {
                insert_navigation(&mut map, navigation);
                map.insert("data".into(), Value::from(envelope.payload.as_str()));
                map.insert(
                    "origin".into(),
                    Value::from(envelope.source_origin.as_str()),
                );
                map.insert(
                    "timestamp".into(),
                    Value::from(envelope.timestamp.timestamp_millis()),
                );
            }
            Self::LoadProgress {
                navigation,
                progress,
            } => {
                insert_navigation(&mut map, navigation);
                map.insert("progress".into(), Value::from(*progress));
            }
            Self::SelectionAction {
                label,
                key,
                selected_text,
            } => {
                map.insert("label".into(), Value::from(label.as_str()));
                map.insert("key".into(), Value::from(key.as_str()));
                map.insert("selectedText".into(), Value::from(selected_text.as_str()));
            }
            Self::ContentSizeChange { width, height } => {
                map.insert("width".into(), Value::from(*width));
                map.insert("height".into(), Value::from(*height));
            }
            Self::OpenWindow { target_url } => {
                map.insert("targetUrl".into(), Value::from(target_url.as_str()));
            }
            Self::PermissionPrompt { permissions } => {
                let ids = permissions.iter().map(|p| Value::from(p.as_str())).collect();
                map.insert("permissions".into(), Value::Array(ids));
            }
        }
        map
    }
}

fn insert_navigation(map: &mut EventPayload, nav: &NavigationSnapshot) {
    if let Ok(Value::Object(fields)) = serde_json::to_value(nav) {
        map.extend(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nav() -> NavigationSnapshot {
        NavigationSnapshot {
            url: "https://shop.example/cart".into(),
            title: "Cart".into(),
            loading: true,
            can_go_back: true,
            can_go_forward: false,
        }
    }

    #[test]
    fn progress_payload_is_flat_camel_case() {
        let payload = HostEvent::LoadProgress {
            navigation: nav(),
            progress: 0.5,
        }
        .to_payload();

        assert_eq!(
            Value::Object(payload),
            json!({
                "type": "loadingProgress",
                "url": "https://shop.example/cart",
                "title": "Cart",
                "loading": true,
                "canGoBack": true,
                "canGoForward": false,
                "progress": 0.5,
            })
        );
    }

    #[test]
    fn message_payload_carries_data_and_origin() {
        let envelope = MessageEnvelope::new("hello", "https://shop.example");
        let payload = HostEvent::Message {
            envelope,
            navigation: nav(),
        }
        .to_payload();

        assert_eq!(payload["type"], "message");
        assert_eq!(payload["data"], "hello");
        assert_eq!(payload["origin"], "https://shop.example");
        assert!(payload["timestamp"].is_i64());
        assert_eq!(payload["canGoBack"], true);
    }

    #[test]
    fn permission_prompt_lists_platform_ids() {
        let payload = HostEvent::PermissionPrompt {
            permissions: vec![HostPermissionId::RecordAudio, HostPermissionId::Camera],
        }
        .to_payload();
        assert_eq!(
            payload["permissions"],
            json!(["android.permission.RECORD_AUDIO", "android.permission.CAMERA"])
        );
    }

    #[test]
    fn selection_and_window_payloads() {
        let sel = HostEvent::SelectionAction {
            label: "Share".into(),
            key: "share".into(),
            selected_text: "total".into(),
        }
        .to_payload();
        assert_eq!(sel["selectedText"], "total");
        assert_eq!(sel["type"], "customMenuSelection");

        let win = HostEvent::OpenWindow {
            target_url: "https://bank.example/3ds".into(),
        }
        .to_payload();
        assert_eq!(win["targetUrl"], "https://bank.example/3ds");
    }

    #[test]
    fn snapshot_deserializes_with_missing_fields() {
        let snap: NavigationSnapshot = serde_json::from_value(json!({"url": "about:blank"})).unwrap();
        assert_eq!(snap.url, "about:blank");
        assert!(!snap.loading);
    }
}
