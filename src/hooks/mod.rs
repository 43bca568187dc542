// src/hooks/mod.rs
// Host hook handlers

pub mod post_tool;
pub mod precompact;
pub mod session;
pub mod stop;
pub mod user_prompt;

use crate::cli::HookAction;
use crate::config::MetacogConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::invocation::Invocation;
use anyhow::Result;
use serde_json::{Value, json};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Performance threshold in milliseconds - warn if hook exceeds this.
/// SessionStart on a fresh session runs git and usually exceeds it.
const HOOK_PERF_THRESHOLD_MS: u128 = 100;

/// Cap on stdin accepted from the host
const MAX_INPUT_BYTES: u64 = 1_048_576;

/// Fields metacog reads from a hook payload. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookInput {
    pub cwd: Option<String>,
    pub session_id: Option<String>,
    pub hook_event_name: Option<String>,
    pub prompt: Option<String>,
    pub tool_name: Option<String>,
    /// `tool_input.file_path`, or `tool_input.notebook_path`
    pub file_path: Option<String>,
    /// SessionStart: startup | resume | clear | compact
    pub source: Option<String>,
    /// PreCompact: manual | auto
    pub trigger: Option<String>,
}

fn str_field(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl HookInput {
    pub fn from_json(json: &Value) -> Self {
        let tool_input = json.get("tool_input").cloned().unwrap_or(Value::Null);
        Self {
            cwd: str_field(json, "cwd"),
            session_id: str_field(json, "session_id"),
            hook_event_name: str_field(json, "hook_event_name"),
            prompt: str_field(json, "prompt"),
            tool_name: str_field(json, "tool_name"),
            file_path: str_field(&tool_input, "file_path")
                .or_else(|| str_field(&tool_input, "notebook_path")),
            source: str_field(json, "source"),
            trigger: str_field(json, "trigger"),
        }
    }

    /// Build the invocation context, or None when the payload lacks a
    /// project root or a usable session id
    pub fn begin(&self, config: MetacogConfig) -> Option<Invocation> {
        let cwd = self.cwd.as_deref()?;
        let session_id = self.session_id.as_deref()?;
        Invocation::new(Path::new(cwd), session_id, config)
    }
}

/// Read hook input from stdin (the host passes JSON)
pub fn read_hook_input() -> std::io::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .take(MAX_INPUT_BYTES)
        .read_to_string(&mut input)?;
    Ok(input)
}

/// Parse a raw payload and open the invocation context. Malformed input is
/// reported on `diagnostics`, which come back in the Err case.
pub fn prepare(
    raw: &str,
    config: MetacogConfig,
    diagnostics: Diagnostics,
) -> std::result::Result<(HookInput, Invocation), Diagnostics> {
    let json: Value = match serde_json::from_str(raw) {
        Ok(json) => json,
        Err(e) => {
            diagnostics.warn(
                DiagnosticKind::MalformedInput,
                format!("unparseable hook input: {e}"),
            );
            return Err(diagnostics);
        }
    };
    let input = HookInput::from_json(&json);

    match input.begin(config) {
        Some(inv) => Ok((input, inv.with_diagnostics(diagnostics))),
        None => {
            diagnostics.note(
                DiagnosticKind::MalformedInput,
                "hook input missing cwd or a usable session_id",
            );
            Err(diagnostics)
        }
    }
}

/// Payload carrying context text back to the host
pub fn hook_output(event_name: &str, context: &str) -> Value {
    json!({
        "hookSpecificOutput": {
            "hookEventName": event_name,
            "additionalContext": context,
        }
    })
}

/// Write hook output to stdout as a single line
pub fn write_hook_output(output: &Value) {
    use std::io::Write;
    match serde_json::to_string(output) {
        Ok(s) => {
            let _ = writeln!(std::io::stdout(), "{}", s);
        }
        Err(e) => {
            tracing::warn!("Failed to serialize hook output: {}", e);
        }
    }
}

/// Route one parsed payload to its handler. Returns the context to inject.
pub async fn handle(action: HookAction, input: &HookInput, inv: &Invocation) -> Option<String> {
    match action {
        HookAction::SessionStart => session::handle(inv, input).await,
        HookAction::UserPrompt => user_prompt::handle(inv, input),
        HookAction::PostTool => post_tool::handle(inv, input),
        HookAction::Stop => stop::handle(inv, input),
        HookAction::PreCompact => precompact::handle(inv, input),
    }
}

/// Run a hook end to end: stdin, handler, stdout. Malformed input aborts
/// silently with no output. `diagnostics` may already hold entries from
/// startup (config parsing).
pub async fn run(
    action: HookAction,
    config: MetacogConfig,
    diagnostics: Diagnostics,
) -> Result<()> {
    let _timer = HookTimer::start(action.event_name());

    let raw = match read_hook_input() {
        Ok(raw) => raw,
        Err(e) => {
            diagnostics.warn(
                DiagnosticKind::MalformedInput,
                format!("unreadable hook input: {e}"),
            );
            return Ok(());
        }
    };

    let Ok((input, inv)) = prepare(&raw, config, diagnostics) else {
        return Ok(());
    };

    if let Some(context) = handle(action, &input, &inv).await {
        write_hook_output(&hook_output(action.event_name(), &context));
    }

    tracing::debug!(
        diagnostics = inv.diagnostics.entries().len(),
        "{} hook finished",
        action.event_name()
    );
    Ok(())
}

/// Timer guard for hook performance monitoring
/// Logs execution time to stderr on drop
pub struct HookTimer {
    hook_name: &'static str,
    start: Instant,
}

impl HookTimer {
    /// Start timing a hook
    pub fn start(hook_name: &'static str) -> Self {
        Self {
            hook_name,
            start: Instant::now(),
        }
    }
}

impl Drop for HookTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_millis();
        if elapsed > HOOK_PERF_THRESHOLD_MS {
            tracing::warn!(
                "[metacog] PERF: {} hook took {}ms (threshold: {}ms)",
                self.hook_name,
                elapsed,
                HOOK_PERF_THRESHOLD_MS
            );
        } else {
            tracing::debug!("[metacog] {} hook completed in {}ms", self.hook_name, elapsed);
        }
    }
}
