// src/cli/debug.rs
// Debug commands for inspecting what the hooks would inject

use crate::config::MetacogConfig;
use crate::diagnostics::Diagnostics;
use crate::git::{probe_workspace, render_git_block};
use crate::invocation::Invocation;
use crate::scan::summarize_tree;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;

fn project_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Ok(std::env::current_dir()?),
    }
}

fn print_diagnostics(diags: &Diagnostics) {
    let entries = diags.entries();
    if entries.is_empty() {
        return;
    }
    println!("\n--- Diagnostics ({}) ---", entries.len());
    for entry in entries {
        println!("  [{}] {}", entry.kind, entry.context);
    }
}

/// Print the collapsed project tree
pub fn run_debug_tree(
    path: Option<PathBuf>,
    depth: Option<usize>,
    config: &MetacogConfig,
) -> Result<()> {
    let root = project_path(path)?;
    let depth = depth.unwrap_or(config.tree_depth);
    tracing::info!(root = %root.display(), depth, "Building project tree");

    let diags = Diagnostics::new();
    println!("{}", summarize_tree(&root, depth, &diags));
    print_diagnostics(&diags);
    Ok(())
}

/// Print git status for repositories directly below the workspace
pub async fn run_debug_git(path: Option<PathBuf>, config: &MetacogConfig) -> Result<()> {
    let root = project_path(path)?;
    tracing::info!(root = %root.display(), "Probing workspace repositories");

    let diags = Diagnostics::new();
    let timeout = Duration::from_secs(config.git_timeout_secs);
    let repos = probe_workspace(&root, timeout, &diags).await;
    if repos.is_empty() {
        println!("No git repositories found below {}", root.display());
    } else {
        println!("{}", render_git_block(&repos, Local::now()));
    }
    print_diagnostics(&diags);
    Ok(())
}

/// Print the persisted record for a session as pretty JSON
pub fn run_debug_state(
    session: &str,
    path: Option<PathBuf>,
    config: MetacogConfig,
) -> Result<()> {
    let root = project_path(path)?;
    let inv = Invocation::with_settings(&root, session, config, None)
        .with_context(|| format!("Invalid session id: {session:?}"))?;

    let path = inv.store.record_path(&inv.session_id);
    println!("Record: {}", path.display());
    if !path.exists() {
        println!("(no record on disk, showing defaults)");
    }

    let record = inv.load_record();
    println!("{}", serde_json::to_string_pretty(&record)?);
    print_diagnostics(&inv.diagnostics);
    Ok(())
}
