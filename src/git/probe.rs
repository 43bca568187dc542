// src/git/probe.rs
// Per-subdirectory repository status for the fresh-session orientation

use super::command::git_cmd;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::utils::format_freshness;
use chrono::{DateTime, Local};
use futures::future::join_all;
use git2::Repository;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

/// Snapshot of one repository below the workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepoInfo {
    /// Directory name relative to the workspace root
    pub relative_path: String,
    /// Branch name, `detached`, or `unknown`
    pub branch: String,
    pub last_activity: Option<SystemTime>,
    pub uncommitted: usize,
    /// Local commits not on the upstream
    pub ahead: usize,
    /// Upstream commits not merged locally
    pub behind: usize,
}

/// Immediate subdirectories whose `.git` is a real directory. Worktree and
/// submodule pointer files are skipped.
pub fn find_repos(root: &Path, diags: &Diagnostics) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            diags.note(
                DiagnosticKind::Git,
                format!("cannot list {}: {e}", root.display()),
            );
            return Vec::new();
        }
    };

    let mut repos: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| p.join(".git").is_dir())
        .collect();
    repos.sort();
    repos
}

/// Branch from the HEAD reference without resolving it, so unborn branches
/// still report their name.
pub fn read_branch(repo_dir: &Path, diags: &Diagnostics) -> String {
    match head_branch(repo_dir) {
        Ok(branch) => branch,
        Err(e) => {
            diags.note(
                DiagnosticKind::Git,
                format!("cannot read HEAD of {}: {}", repo_dir.display(), e),
            );
            "unknown".to_string()
        }
    }
}

fn head_branch(repo_dir: &Path) -> crate::Result<String> {
    let repo = Repository::open(repo_dir)?;
    let head = repo.find_reference("HEAD")?;
    Ok(match head.symbolic_target() {
        Some(target) => target
            .strip_prefix("refs/heads/")
            .unwrap_or(target)
            .to_string(),
        None => "detached".to_string(),
    })
}

/// Newest mtime among local branch refs, else the HEAD file's mtime
pub fn last_activity(repo_dir: &Path) -> Option<SystemTime> {
    let git_dir = repo_dir.join(".git");

    let newest_ref = WalkDir::new(git_dir.join("refs").join("heads"))
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok()?.modified().ok())
        .max();

    newest_ref.or_else(|| {
        fs::metadata(git_dir.join("HEAD"))
            .and_then(|m| m.modified())
            .ok()
    })
}

async fn count_uncommitted(repo_dir: &Path, timeout: Duration, diags: &Diagnostics) -> usize {
    match git_cmd(repo_dir, &["status", "--porcelain"], timeout).await {
        Ok(out) => out.lines().filter(|l| !l.trim().is_empty()).count(),
        Err(e) => {
            diags.note(
                DiagnosticKind::Git,
                format!("status in {}: {e}", repo_dir.display()),
            );
            0
        }
    }
}

/// (ahead, behind) relative to the upstream; (0, 0) when there is none
async fn count_ahead_behind(
    repo_dir: &Path,
    timeout: Duration,
    diags: &Diagnostics,
) -> (usize, usize) {
    let args = ["rev-list", "--left-right", "--count", "@{upstream}...HEAD"];
    match git_cmd(repo_dir, &args, timeout).await {
        Ok(out) => parse_left_right(&out).unwrap_or_else(|| {
            diags.note(DiagnosticKind::Git, format!("unexpected rev-list output: {out}"));
            (0, 0)
        }),
        Err(e) => {
            diags.note(
                DiagnosticKind::Git,
                format!("ahead/behind in {}: {e}", repo_dir.display()),
            );
            (0, 0)
        }
    }
}

/// Parse `<behind>\t<ahead>` into (ahead, behind)
fn parse_left_right(out: &str) -> Option<(usize, usize)> {
    let mut parts = out.split_whitespace();
    let behind = parts.next()?.parse().ok()?;
    let ahead = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}

async fn probe_repo(
    root: &Path,
    repo_dir: &Path,
    timeout: Duration,
    diags: &Diagnostics,
) -> GitRepoInfo {
    let (uncommitted, (ahead, behind)) = tokio::join!(
        count_uncommitted(repo_dir, timeout, diags),
        count_ahead_behind(repo_dir, timeout, diags),
    );

    GitRepoInfo {
        relative_path: crate::utils::relative_slash_path(repo_dir, root),
        branch: read_branch(repo_dir, diags),
        last_activity: last_activity(repo_dir),
        uncommitted,
        ahead,
        behind,
    }
}

/// Probe every repository directly below `root`, most recently active first
pub async fn probe_workspace(
    root: &Path,
    timeout: Duration,
    diags: &Diagnostics,
) -> Vec<GitRepoInfo> {
    let repos = find_repos(root, diags);
    if repos.is_empty() {
        return Vec::new();
    }
    tracing::debug!(count = repos.len(), "Probing git repositories");

    let mut infos = join_all(
        repos
            .iter()
            .map(|repo| probe_repo(root, repo, timeout, diags)),
    )
    .await;

    infos.sort_by(|a, b| {
        b.last_activity
            .cmp(&a.last_activity)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
    infos
}

/// One line per repository, e.g.
/// `  - api/ [main] active 14:32 | 3 uncommitted, 1 unpushed, 0 unpulled`
pub fn render_git_block(repos: &[GitRepoInfo], now: DateTime<Local>) -> String {
    let mut lines = vec!["Git repositories in this workspace:".to_string()];
    for repo in repos {
        let activity = repo
            .last_activity
            .map(|t| format!(" active {}", format_freshness(t, now)))
            .unwrap_or_default();
        lines.push(format!(
            "  - {}/ [{}]{} | {} uncommitted, {} unpushed, {} unpulled",
            repo.relative_path, repo.branch, activity, repo.uncommitted, repo.ahead, repo.behind
        ));
    }
    lines.join("\n")
}
