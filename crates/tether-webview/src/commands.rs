//! Commands a host sends to a content surface by name.

use serde_json::Value;
use tether_common::BridgeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    GoBack,
    GoForward,
    Reload,
    StopLoading,
    /// Deliver `data` to the page as a DOM `message` event.
    PostMessage(String),
    InjectJavaScript(String),
    LoadUrl(String),
    RequestFocus,
    ClearFormData,
    ClearCache { include_disk_files: bool },
    ClearHistory,
}

impl SurfaceCommand {
    /// Parse a command name plus positional arguments.
    pub fn parse(name: &str, args: &[Value]) -> Result<Self, BridgeError> {
        let cmd = match name {
            "goBack" => Self::GoBack,
            "goForward" => Self::GoForward,
            "reload" => Self::Reload,
            "stopLoading" => Self::StopLoading,
            "postMessage" => Self::PostMessage(string_arg(name, args, 0)?),
            "injectJavaScript" => Self::InjectJavaScript(string_arg(name, args, 0)?),
            "loadUrl" => Self::LoadUrl(string_arg(name, args, 0)?),
            "requestFocus" => Self::RequestFocus,
            "clearFormData" => Self::ClearFormData,
            "clearCache" => Self::ClearCache {
                include_disk_files: bool_arg(name, args, 0)?,
            },
            "clearHistory" => Self::ClearHistory,
            other => return Err(BridgeError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GoBack => "goBack",
            Self::GoForward => "goForward",
            Self::Reload => "reload",
            Self::StopLoading => "stopLoading",
            Self::PostMessage(_) => "postMessage",
            Self::InjectJavaScript(_) => "injectJavaScript",
            Self::LoadUrl(_) => "loadUrl",
            Self::RequestFocus => "requestFocus",
            Self::ClearFormData => "clearFormData",
            Self::ClearCache { .. } => "clearCache",
            Self::ClearHistory => "clearHistory",
        }
    }
}

fn string_arg(command: &str, args: &[Value], index: usize) -> Result<String, BridgeError> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(command, format!("expected a string at index {index}")))
}

fn bool_arg(command: &str, args: &[Value], index: usize) -> Result<bool, BridgeError> {
    args.get(index)
        .and_then(Value::as_bool)
        .ok_or_else(|| invalid(command, format!("expected a boolean at index {index}")))
}

fn invalid(command: &str, reason: String) -> BridgeError {
    BridgeError::InvalidArguments {
        command: command.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_argument_free_commands() {
        for name in [
            "goBack",
            "goForward",
            "reload",
            "stopLoading",
            "requestFocus",
            "clearFormData",
            "clearHistory",
        ] {
            let cmd = SurfaceCommand::parse(name, &[]).unwrap();
            assert_eq!(cmd.name(), name);
        }
    }

    #[test]
    fn parses_string_arguments() {
        assert_eq!(
            SurfaceCommand::parse("loadUrl", &[json!("https://a.example")]).unwrap(),
            SurfaceCommand::LoadUrl("https://a.example".into())
        );
        assert_eq!(
            SurfaceCommand::parse("postMessage", &[json!("{\"a\":1}")]).unwrap(),
            SurfaceCommand::PostMessage("{\"a\":1}".into())
        );
    }

    #[test]
    fn parses_clear_cache_flag() {
        assert_eq!(
            SurfaceCommand::parse("clearCache", &[json!(true)]).unwrap(),
            SurfaceCommand::ClearCache {
                include_disk_files: true
            }
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let err = SurfaceCommand::parse("print", &[]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownCommand(name) if name == "print"));
    }

    #[test]
    fn rejects_missing_or_mistyped_arguments() {
        assert!(matches!(
            SurfaceCommand::parse("loadUrl", &[]),
            Err(BridgeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            SurfaceCommand::parse("injectJavaScript", &[json!(42)]),
            Err(BridgeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            SurfaceCommand::parse("clearCache", &[json!("yes")]),
            Err(BridgeError::InvalidArguments { .. })
        ));
    }
}
