//! Full configuration validation.
//!
//! Checks that the bridge global is a usable JS identifier, that menu items
//! are complete, and that optional names are not blank.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tether_common::ConfigError;

use crate::schema::TetherConfig;

/// Identifiers the bridge global may not shadow.
const RESERVED_GLOBALS: &[&str] = &["window", "document", "ipc", "chrome", "undefined"];

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Whether `name` can be used as `window.<name>` in page scripts.
pub fn is_js_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name) && !RESERVED_GLOBALS.contains(&name)
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TetherConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if !is_js_identifier(&config.bridge.global_name) {
        errors.push(format!(
            "bridge.global_name '{}' is not a valid script identifier",
            config.bridge.global_name
        ));
    }

    validate_not_blank(
        &mut errors,
        "bridge.messaging_module_name",
        config.bridge.messaging_module_name.as_deref(),
    );

    if let Some(json) = &config.bridge.injected_object {
        if serde_json::from_str::<serde_json::Value>(json).is_err() {
            errors.push("bridge.injected_object is not valid JSON".to_string());
        }
    }

    let mut seen_keys = HashSet::new();
    for (i, item) in config.events.menu_custom_items.iter().enumerate() {
        if item.label.trim().is_empty() {
            errors.push(format!("events.menu_custom_items[{i}].label is empty"));
        }
        if item.key.trim().is_empty() {
            errors.push(format!("events.menu_custom_items[{i}].key is empty"));
        } else if !seen_keys.insert(item.key.as_str()) {
            errors.push(format!(
                "events.menu_custom_items[{i}].key '{}' is duplicated",
                item.key
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_not_blank(errors: &mut Vec<String>, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        if v.trim().is_empty() {
            errors.push(format!("{field} is set but blank"));
        }
    }
}
