// src/context/compose.rs
// Assembles the text blocks handed back to the host

use super::templates::*;
use crate::git::{probe_workspace, render_git_block};
use crate::invocation::Invocation;
use crate::scan::{exclude_tracked, get_file_mtime, get_recent_files, summarize_tree};
use crate::state::SessionRecord;
use crate::state::file_access::format_kinds;
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Repeat a message `count` times (at least once) for emphasis
pub fn repeat_message(message: &str, count: usize) -> String {
    vec![message; count.max(1)].join(REPEAT_SEPARATOR)
}

/// Reflection nudge wrapped around the user's prompt: nudge, prompt, nudge
pub fn render_reflection(prompt: &str) -> String {
    [PRE_TASK_REFLECTION, prompt, PRE_TASK_REFLECTION].join(REPEAT_SEPARATOR)
}

/// `HH:MM` on the same day as `now`, `YYYY-MM-DD HH:MM` otherwise
fn format_start(start: DateTime<Local>, now: DateTime<Local>) -> String {
    if start.date_naive() == now.date_naive() {
        start.format("%H:%M").to_string()
    } else {
        start.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Post-compaction reconstruction of the task in progress
pub fn render_compaction(record: &SessionRecord, inv: &Invocation) -> String {
    let mut lines: Vec<String> = vec![
        COMPACTION_BANNER.to_string(),
        String::new(),
        COMPACTION_EXPLANATION.to_string(),
        String::new(),
    ];

    match record.initial_prompt.as_deref() {
        Some(prompt) => push_task_blocks(&mut lines, record, prompt, inv),
        None => {
            lines.push(NO_TASK_CONTEXT.to_string());
            lines.push(String::new());
        }
    }

    lines.push(POST_COMPACTION_REMINDER.to_string());

    if inv.memory_capability() {
        lines.push(String::new());
        lines.push(MEMORY_POINTER.to_string());
    }

    lines.join("\n")
}

fn push_task_blocks(
    lines: &mut Vec<String>,
    record: &SessionRecord,
    prompt: &str,
    inv: &Invocation,
) {
    if let Some(start) = record.initial_timestamp {
        lines.push(format!("Task started at: {}", format_start(start, inv.now)));
        lines.push(format!("Compaction at: {}", inv.now.format("%H:%M")));
        lines.push(String::new());
    }

    lines.push("INITIAL REQUEST:".to_string());
    lines.push(prompt.to_string());
    lines.push(String::new());

    let interventions = record.recent_interventions(inv.config.max_interventions);
    if !interventions.is_empty() {
        lines.push("USER INTERVENTIONS:".to_string());
        for intervention in interventions {
            lines.push(format!("  - {}", intervention.text));
        }
        lines.push(String::new());
    }

    // file blocks are scoped to the task's time window
    let Some(start) = record.initial_timestamp else {
        return;
    };

    if !record.file_access.is_empty() {
        lines.push("FILES ACCESSED DURING THIS TASK:".to_string());
        for (path, kinds) in &record.file_access {
            let mtime = get_file_mtime(&inv.project_root, path)
                .map(|t| format!(" ({t})"))
                .unwrap_or_default();
            lines.push(format!("  - {path} [{}]{mtime}", format_kinds(kinds)));
        }
        lines.push(String::new());
    }

    let recent = get_recent_files(
        &inv.project_root,
        SystemTime::from(start),
        inv.config.recent_files_limit,
        &inv.diagnostics,
    );
    let others = exclude_tracked(recent, &record.file_access);
    if !others.is_empty() {
        lines.push("OTHER FILES CHANGED SINCE THE TASK STARTED:".to_string());
        lines.push(OTHER_FILES_NOTE.to_string());
        for file in &others {
            lines.push(format!("  - {} ({})", file.path, file.clock()));
        }
        lines.push(String::new());
    }
}

/// Orientation for a session with no prior history
pub async fn render_fresh_session(inv: &Invocation) -> String {
    let mut blocks = vec![repeat_message(FRESH_SESSION, inv.config.repetition_count)];

    if inv.memory_capability() {
        let tree = summarize_tree(&inv.project_root, inv.config.tree_depth, &inv.diagnostics);
        blocks.push(format!("{PROJECT_TREE_HEADER}\n{tree}"));
    }

    let repos = probe_workspace(&inv.project_root, inv.git_timeout(), &inv.diagnostics).await;
    if !repos.is_empty() {
        blocks.push(render_git_block(&repos, inv.now));
    }

    blocks.push(NO_REPO_MUTATION.to_string());
    blocks.join("\n\n")
}
