// src/capability.rs
// Detection of a sibling memory plugin from the host's user settings

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Environment variable the host uses to relocate its config directory
pub const CLAUDE_CONFIG_ENV: &str = "CLAUDE_CONFIG_DIR";

/// `$CLAUDE_CONFIG_DIR/settings.json`, or `~/.claude/settings.json`
pub fn settings_path() -> Option<PathBuf> {
    let dir = match std::env::var(CLAUDE_CONFIG_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()?.join(".claude"),
    };
    Some(dir.join("settings.json"))
}

/// True when `enabledPlugins` holds a key containing `pattern` set to `true`
pub fn plugin_enabled(settings: &Value, pattern: &str) -> bool {
    settings
        .get("enabledPlugins")
        .and_then(Value::as_object)
        .is_some_and(|plugins| {
            plugins
                .iter()
                .any(|(name, enabled)| name.contains(pattern) && enabled.as_bool() == Some(true))
        })
}

/// Read the settings file and check for the memory plugin. Any failure
/// reads as "not installed".
pub fn detect_memory_capability(
    settings: Option<&Path>,
    pattern: &str,
    diags: &Diagnostics,
) -> bool {
    let Some(path) = settings else {
        diags.note(DiagnosticKind::Capability, "no home directory for settings");
        return false;
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            diags.note(
                DiagnosticKind::Capability,
                format!("cannot read {}: {e}", path.display()),
            );
            return false;
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(settings) => plugin_enabled(&settings, pattern),
        Err(e) => {
            diags.warn(
                DiagnosticKind::Capability,
                format!("invalid settings JSON in {}: {e}", path.display()),
            );
            false
        }
    }
}
