use super::*;
use crate::schema::MenuItemConfig;

#[test]
fn default_config_is_valid() {
    assert!(validate(&TetherConfig::default()).is_ok());
}

#[test]
fn identifier_rules() {
    assert!(is_js_identifier("TetherBridge"));
    assert!(is_js_identifier("_bridge"));
    assert!(is_js_identifier("$host1"));
    assert!(!is_js_identifier(""));
    assert!(!is_js_identifier("1bridge"));
    assert!(!is_js_identifier("my-bridge"));
    assert!(!is_js_identifier("a.b"));
    assert!(!is_js_identifier("window"));
}

#[test]
fn invalid_global_name_is_rejected() {
    let mut config = TetherConfig::default();
    config.bridge.global_name = "not valid".into();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("bridge.global_name"));
}

#[test]
fn blank_module_name_is_rejected() {
    let mut config = TetherConfig::default();
    config.bridge.messaging_module_name = Some("  ".into());
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("bridge.messaging_module_name"));
}

#[test]
fn injected_object_must_be_json() {
    let mut config = TetherConfig::default();
    config.bridge.injected_object = Some(r#"{"token": "abc"}"#.into());
    assert!(validate(&config).is_ok());

    config.bridge.injected_object = Some("{token: abc".into());
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("bridge.injected_object"));
}

#[test]
fn menu_items_need_label_and_unique_key() {
    let mut config = TetherConfig::default();
    config.events.menu_custom_items = vec![
        MenuItemConfig {
            label: "Copy".into(),
            key: "copy".into(),
        },
        MenuItemConfig {
            label: "".into(),
            key: "copy".into(),
        },
    ];
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("menu_custom_items[1].label is empty"));
    assert!(msg.contains("'copy' is duplicated"));
}

#[test]
fn all_errors_are_collected() {
    let mut config = TetherConfig::default();
    config.bridge.global_name = "9".into();
    config.bridge.messaging_module_name = Some(String::new());
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("global_name"));
    assert!(msg.contains("messaging_module_name"));
}
