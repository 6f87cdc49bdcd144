//! Wire formats between page scripts and the host.
//!
//! Messages flow in both directions:
//! - **JS -> host**: page code calls `window.<Bridge>.postMessage(string)`.
//!   The platform delivers the string plus the frame's origin, which becomes
//!   a [`MessageEnvelope`].
//! - **host -> JS**: the host evaluates generated script. Every value that
//!   ends up inside generated script is escaped through `serde_json`, which
//!   always yields a valid JS literal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbound `postMessage` call, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Raw string the page posted.
    pub payload: String,
    /// Origin (or URL) of the frame that posted it.
    pub source_origin: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageEnvelope {
    pub fn new(payload: impl Into<String>, source_origin: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            source_origin: source_origin.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Encode a string as a JS string literal.
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script that (re)defines the bridge global and its object accessor.
///
/// Existing members of the global are preserved, so an interface object the
/// platform registered under the same name keeps its `postMessage`. The
/// accessor returns `injected_object` as a JSON string, or `null` when unset.
pub fn bridge_global_script(global_name: &str, injected_object: Option<&str>) -> String {
    let name = js_string(global_name);
    let value = injected_object.map_or_else(|| "null".to_string(), js_string);
    format!(
        r#"(function() {{
    var name = {name};
    window[name] = window[name] || {{}};
    window[name].injectedObjectJson = function () {{ return {value}; }};
}})();"#
    )
}

/// Wrap a user script in its own function scope.
pub fn isolated_script(body: &str) -> String {
    format!("(function() {{\n{body};\n}})();")
}

/// Script that delivers `data` to the page as a DOM `message` event.
pub fn content_message_script(data: &str) -> String {
    let init = serde_json::json!({ "data": data });
    format!(
        r#"(function () {{
    var event;
    var data = {init};
    try {{
        event = new MessageEvent('message', data);
    }} catch (e) {{
        event = document.createEvent('MessageEvent');
        event.initMessageEvent('message', true, true, data.data, data.origin, data.lastEventId, data.source);
    }}
    document.dispatchEvent(event);
}})();"#
    )
}
