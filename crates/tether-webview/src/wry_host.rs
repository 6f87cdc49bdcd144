//! Host adapters for a native `wry::WebView`.
//!
//! wry always exposes `window.ipc.postMessage`, so surfaces backed by it use
//! the listener transport. A small init script forwards the bridge global's
//! `postMessage` to it, and the IPC handler feeds a [`BridgePoster`].
//!
//! wry has no permission or geolocation hooks; hosts that need them supply
//! their own [`PermissionHost`](crate::host::PermissionHost).

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tether_common::BridgeError;
use tracing::debug;
use wry::{WebView, WebViewBuilder};

use crate::bridge::BridgePoster;
use crate::events::PageLoadState;
use crate::host::{FeatureProbe, Navigator, ScriptEvaluator};
use crate::ipc::js_string;

fn engine_error(e: wry::Error) -> BridgeError {
    BridgeError::ScriptEvaluation(e.to_string())
}

/// Script evaluation through the webview.
pub struct WryScripts(pub Rc<WebView>);

impl ScriptEvaluator for WryScripts {
    fn evaluate(&self, script: &str) -> Result<(), BridgeError> {
        self.0.evaluate_script(script).map_err(engine_error)
    }
}

/// Navigation through the webview. History and stop go through page script
/// since wry has no native calls for them.
pub struct WryNavigator(pub Rc<WebView>);

impl Navigator for WryNavigator {
    fn load_url(&mut self, url: &str) -> Result<(), BridgeError> {
        self.0.load_url(url).map_err(engine_error)
    }

    fn go_back(&mut self) -> Result<(), BridgeError> {
        self.0.evaluate_script("history.back();").map_err(engine_error)
    }

    fn go_forward(&mut self) -> Result<(), BridgeError> {
        self.0
            .evaluate_script("history.forward();")
            .map_err(engine_error)
    }

    fn reload(&mut self) -> Result<(), BridgeError> {
        self.0.reload().map_err(engine_error)
    }

    fn stop_loading(&mut self) -> Result<(), BridgeError> {
        self.0.evaluate_script("window.stop();").map_err(engine_error)
    }

    fn request_focus(&mut self) -> Result<(), BridgeError> {
        self.0.focus().map_err(engine_error)
    }

    fn clear_cache(&mut self, _include_disk_files: bool) -> Result<(), BridgeError> {
        self.0.clear_all_browsing_data().map_err(engine_error)
    }
}

pub struct WryFeatures;

impl FeatureProbe for WryFeatures {
    fn supports_message_listener(&self) -> bool {
        true
    }
}

/// Init script routing `window[<global>].postMessage` into wry's IPC channel.
pub fn listener_shim_script(global_name: &str) -> String {
    let name = js_string(global_name);
    format!(
        r#"(function() {{
    var name = {name};
    window[name] = window[name] || {{}};
    window[name].postMessage = function (message) {{
        window.ipc.postMessage(String(message));
    }};
}})();"#
    )
}

/// Wire the bridge into a webview under construction.
pub fn attach_bridge<'a>(
    builder: WebViewBuilder<'a>,
    poster: BridgePoster,
    global_name: &str,
) -> WebViewBuilder<'a> {
    builder
        .with_initialization_script(&listener_shim_script(global_name))
        .with_ipc_handler(move |request| {
            let origin = request.uri().to_string();
            let body = request.body().to_string();
            debug!(origin = %origin, body_len = body.len(), "IPC message from page");
            poster.post(body, origin);
        })
}

/// Collects page-load notifications from wry's handler so the UI loop can
/// feed them to [`ContentSurface::on_page_load`](crate::ContentSurface::on_page_load).
#[derive(Debug, Clone, Default)]
pub struct PageLoadCollector {
    events: Arc<Mutex<Vec<(PageLoadState, String)>>>,
}

impl PageLoadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach<'a>(&self, builder: WebViewBuilder<'a>) -> WebViewBuilder<'a> {
        let events = Arc::clone(&self.events);
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push((state, url));
            }
        })
    }

    /// Take every notification received since the last drain.
    pub fn drain(&self) -> Vec<(PageLoadState, String)> {
        match self.events.lock() {
            Ok(mut evts) => std::mem::take(&mut *evts),
            Err(_) => Vec::new(),
        }
    }
}
