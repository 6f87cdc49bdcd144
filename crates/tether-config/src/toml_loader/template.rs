//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Tether Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
# messaging_enabled = false
# global_name = "TetherBridge"       # must be a valid JS identifier
# messaging_module_name = "WebViewMessaging"
# injected_object = '{"locale": "en"}'

[scripts]
# javascript_enabled = true
# injected = "document.body.dataset.host = 'tether';"
# injected_for_main_frame_only = true
# before_content_loaded = "window.__hostReady = true;"
# before_content_loaded_for_main_frame_only = true

[permissions]
# allows_protected_media = false
# geolocation_enabled = true

[events]
# send_content_size_changes = false
# has_on_open_window_event = false
#
# [[events.menu_custom_items]]
# label = "Share"
# key = "share"

[logging]
# level = "info"                     # trace, debug, info, warn, error
"##
    .to_string()
}
