// src/utils.rs
// Shared helpers for time formatting and paths

use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;

/// Local wall-clock time as `HH:MM`
pub fn format_clock(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%H:%M").to_string()
}

/// `HH:MM` when `time` falls on the same calendar day as `now`, otherwise
/// `YYYY-MM-DD`
pub fn format_freshness(time: SystemTime, now: DateTime<Local>) -> String {
    let local = DateTime::<Local>::from(time);
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%Y-%m-%d").to_string()
    }
}

/// Project-relative path with forward slashes
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Truncate a string to at most `max_chars` characters, appending an ellipsis
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
