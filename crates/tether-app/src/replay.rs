//! Scripted host for driving a [`ContentSurface`] from a JSON-lines file.
//!
//! Each input line is one [`Step`]. Everything the surface asks of its host
//! (scripts, prompts, events, navigation, permission answers) is recorded as
//! an [`Output`] and written as one JSON line.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tether_common::{BridgeError, TetherError};
use tether_config::TetherConfig;
use tether_webview::{
    ContentCapability, ContentSurface, EventPayload, EventSink, FeatureProbe, HostBindings,
    HostPermissionId, MessagingModule, NavigationSnapshot, Navigator, PageLoadState,
    PermissionHost, ScriptEvaluator,
};
use tracing::{debug, warn};

/// One scenario line.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    EnableMessaging {
        #[serde(default = "yes")]
        enabled: bool,
    },
    /// A page message, posted as if from a script-engine thread.
    Post {
        data: String,
        #[serde(default)]
        origin: String,
    },
    Pump,
    PageLoad {
        state: PageLoadState,
        url: String,
    },
    Progress {
        progress: u8,
        #[serde(default)]
        navigation: NavigationSnapshot,
    },
    /// Mark a host permission as already granted by the OS.
    Grant {
        permission: HostPermissionId,
    },
    PermissionRequest {
        capabilities: Vec<ContentCapability>,
    },
    GeolocationPrompt {
        origin: String,
    },
    PermissionResult {
        results: Vec<(HostPermissionId, bool)>,
    },
    Command {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    ContentSize {
        width: u32,
        height: u32,
    },
    #[serde(rename_all = "camelCase")]
    OpenWindow {
        target_url: String,
    },
    MenuItem {
        index: usize,
        selection: String,
    },
    Teardown,
}

fn yes() -> bool {
    true
}

/// One host-bound call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Output {
    Script {
        script: String,
    },
    Prompt {
        permissions: Vec<HostPermissionId>,
    },
    Event {
        payload: Value,
    },
    Module {
        event: Value,
    },
    Navigate {
        action: String,
    },
    CaptureAnswer {
        granted: Vec<ContentCapability>,
    },
    GeolocationAnswer {
        origin: String,
        granted: bool,
        retain: bool,
    },
    Error {
        line: usize,
        message: String,
    },
}

/// Shared state behind every host trait the surface is bound to.
#[derive(Clone, Default)]
struct ScriptedHost {
    log: Arc<Mutex<Vec<Output>>>,
    granted: Arc<Mutex<BTreeSet<HostPermissionId>>>,
}

impl ScriptedHost {
    fn record(&self, output: Output) {
        if let Ok(mut log) = self.log.lock() {
            log.push(output);
        }
    }

    fn take(&self) -> Vec<Output> {
        match self.log.lock() {
            Ok(mut log) => std::mem::take(&mut *log),
            Err(_) => Vec::new(),
        }
    }

    fn navigate(&self, action: impl Into<String>) -> Result<(), BridgeError> {
        self.record(Output::Navigate {
            action: action.into(),
        });
        Ok(())
    }
}

impl ScriptEvaluator for ScriptedHost {
    fn evaluate(&self, script: &str) -> Result<(), BridgeError> {
        self.record(Output::Script {
            script: script.to_string(),
        });
        Ok(())
    }
}

impl PermissionHost for ScriptedHost {
    fn is_granted(&self, permission: HostPermissionId) -> bool {
        self.granted
            .lock()
            .map(|g| g.contains(&permission))
            .unwrap_or(false)
    }

    fn show_prompt(&mut self, permissions: &[HostPermissionId]) {
        self.record(Output::Prompt {
            permissions: permissions.to_vec(),
        });
    }
}

impl EventSink for ScriptedHost {
    fn on_event(&self, payload: EventPayload) {
        self.record(Output::Event {
            payload: Value::Object(payload),
        });
    }
}

impl MessagingModule for ScriptedHost {
    fn on_message(&self, event: Value) {
        self.record(Output::Module { event });
    }
}

impl FeatureProbe for ScriptedHost {
    fn supports_message_listener(&self) -> bool {
        true
    }
}

impl Navigator for ScriptedHost {
    fn load_url(&mut self, url: &str) -> Result<(), BridgeError> {
        self.navigate(format!("loadUrl {url}"))
    }

    fn go_back(&mut self) -> Result<(), BridgeError> {
        self.navigate("goBack")
    }

    fn go_forward(&mut self) -> Result<(), BridgeError> {
        self.navigate("goForward")
    }

    fn reload(&mut self) -> Result<(), BridgeError> {
        self.navigate("reload")
    }

    fn stop_loading(&mut self) -> Result<(), BridgeError> {
        self.navigate("stopLoading")
    }

    fn request_focus(&mut self) -> Result<(), BridgeError> {
        self.navigate("requestFocus")
    }

    fn clear_form_data(&mut self) -> Result<(), BridgeError> {
        self.navigate("clearFormData")
    }

    fn clear_cache(&mut self, include_disk_files: bool) -> Result<(), BridgeError> {
        self.navigate(format!("clearCache {include_disk_files}"))
    }

    fn clear_history(&mut self) -> Result<(), BridgeError> {
        self.navigate("clearHistory")
    }
}

/// Run a scenario, writing one JSON line per host-bound call. Returns the
/// number of steps executed.
pub fn run<R: BufRead, W: Write>(
    config: &TetherConfig,
    input: R,
    mut out: W,
) -> Result<usize, TetherError> {
    let host = ScriptedHost::default();
    let bindings = HostBindings {
        scripts: Box::new(host.clone()),
        permissions: Box::new(host.clone()),
        navigator: Box::new(host.clone()),
        events: Box::new(host.clone()),
        messaging_module: Some(Box::new(host.clone())),
        features: Box::new(host.clone()),
    };
    let mut surface = ContentSurface::new(config, bindings);
    let mut steps = 0;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line_no = index + 1;
        let step: Step = serde_json::from_str(trimmed)
            .map_err(|e| TetherError::Other(format!("line {line_no}: {e}")))?;
        debug!(line = line_no, ?step, "replay step");

        if let Err(e) = apply(&mut surface, &host, step) {
            warn!(line = line_no, error = %e, "step failed");
            host.record(Output::Error {
                line: line_no,
                message: e.to_string(),
            });
        }
        steps += 1;

        for output in host.take() {
            serde_json::to_writer(&mut out, &output)?;
            writeln!(out)?;
        }
    }

    surface.teardown();
    out.flush()?;
    Ok(steps)
}

fn apply(surface: &mut ContentSurface, host: &ScriptedHost, step: Step) -> Result<(), BridgeError> {
    match step {
        Step::EnableMessaging { enabled } => {
            surface.set_messaging_enabled(enabled);
        }
        Step::Post { data, origin } => {
            let poster = surface.poster();
            // Posted off the UI thread, the way a script engine would.
            let posted = std::thread::spawn(move || poster.post(data, origin))
                .join()
                .unwrap_or(false);
            if !posted {
                debug!("message dropped by bridge");
            }
        }
        Step::Pump => {
            surface.pump();
        }
        Step::PageLoad { state, url } => surface.on_page_load(state, &url),
        Step::Progress {
            progress,
            navigation,
        } => {
            surface.on_progress_changed(progress, navigation);
        }
        Step::Grant { permission } => {
            if let Ok(mut granted) = host.granted.lock() {
                granted.insert(permission);
            }
        }
        Step::PermissionRequest { capabilities } => {
            let answers = host.clone();
            surface.on_permission_request(
                capabilities,
                Box::new(move |granted| answers.record(Output::CaptureAnswer { granted })),
            );
        }
        Step::GeolocationPrompt { origin } => {
            let answers = host.clone();
            surface.on_geolocation_prompt(
                origin,
                Box::new(move |origin: &str, granted: bool, retain: bool| {
                    answers.record(Output::GeolocationAnswer {
                        origin: origin.to_string(),
                        granted,
                        retain,
                    })
                }),
            );
        }
        Step::PermissionResult { results } => surface.on_permission_result(&results),
        Step::Command { name, args } => surface.receive_named_command(&name, &args)?,
        Step::ContentSize { width, height } => {
            surface.on_content_size_changed(width, height);
        }
        Step::OpenWindow { target_url } => {
            surface.on_open_window(&target_url);
        }
        Step::MenuItem { index, selection } => {
            surface.on_custom_menu_item(index, &selection);
        }
        Step::Teardown => surface.teardown(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(config: &TetherConfig, scenario: &str) -> Vec<Value> {
        let mut out = Vec::new();
        run(config, scenario.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn message_round_trip_through_generic_sink() {
        let lines = replay(
            &TetherConfig::default(),
            r#"{"op":"enableMessaging"}
{"op":"post","data":"hi","origin":"https://a.example"}
{"op":"pump"}"#,
        );

        assert_eq!(lines[0]["kind"], "script");
        let event = lines.iter().find(|l| l["kind"] == "event").unwrap();
        assert_eq!(event["payload"]["type"], "message");
        assert_eq!(event["payload"]["data"], "hi");
    }

    #[test]
    fn queued_permission_prompts_replay_in_order() {
        let lines = replay(
            &TetherConfig::default(),
            r#"{"op":"permissionRequest","capabilities":["android.webkit.resource.AUDIO_CAPTURE"]}
{"op":"permissionRequest","capabilities":["android.webkit.resource.VIDEO_CAPTURE"]}
{"op":"permissionResult","results":[["android.permission.RECORD_AUDIO",true]]}"#,
        );

        let prompts: Vec<&Value> = lines.iter().filter(|l| l["kind"] == "prompt").collect();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0]["permissions"][0], "android.permission.RECORD_AUDIO");
        assert_eq!(prompts[1]["permissions"][0], "android.permission.CAMERA");

        let answer = lines
            .iter()
            .find(|l| l["kind"] == "captureAnswer")
            .unwrap();
        assert_eq!(
            answer["granted"][0],
            "android.webkit.resource.AUDIO_CAPTURE"
        );
    }

    #[test]
    fn unknown_capability_string_is_rejected() {
        let mut out = Vec::new();
        let err = run(
            &TetherConfig::default(),
            r#"{"op":"permissionRequest","capabilities":["android.webkit.resource.GYROSCOPE"]}"#
                .as_bytes(),
            &mut out,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("line 1:"));
        assert!(message.contains("unknown content capability: android.webkit.resource.GYROSCOPE"));
    }

    #[test]
    fn granted_permission_answers_without_prompt() {
        let lines = replay(
            &TetherConfig::default(),
            r#"{"op":"grant","permission":"android.permission.CAMERA"}
{"op":"permissionRequest","capabilities":["android.webkit.resource.VIDEO_CAPTURE"]}"#,
        );
        assert!(lines.iter().all(|l| l["kind"] != "prompt"));
        assert_eq!(lines[0]["kind"], "captureAnswer");
    }

    #[test]
    fn command_errors_are_reported_and_replay_continues() {
        let lines = replay(
            &TetherConfig::default(),
            r#"{"op":"command","name":"fly"}
{"op":"command","name":"loadUrl","args":["https://b.example/"]}
{"op":"progress","progress":50}"#,
        );

        assert_eq!(lines[0]["kind"], "error");
        assert_eq!(lines[0]["line"], 1);
        assert_eq!(lines[1]["action"], "loadUrl https://b.example/");
        // Progress from the host's own loadUrl is suppressed.
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let mut out = Vec::new();
        let steps = run(
            &TetherConfig::default(),
            "# setup\n\n{\"op\":\"pump\"}\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(steps, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_line_is_an_error() {
        let mut out = Vec::new();
        let err = run(
            &TetherConfig::default(),
            "{\"op\":\"launch\"}\n".as_bytes(),
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("line 1:"));
    }
}
