// src/scan/recent.rs
// Files changed since a point in time, for cross-agent visibility

use crate::config::ignore::is_infra_dir;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::state::FileAccessMap;
use crate::utils::{format_clock, relative_slash_path};
use std::path::Path;
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Default cap on the number of recent files returned
pub const DEFAULT_RECENT_LIMIT: usize = 15;

/// A file modified at or after the scan threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFile {
    /// Project-relative, forward-slash path
    pub path: String,
    pub modified: SystemTime,
}

impl RecentFile {
    /// Modification time as `HH:MM`
    pub fn clock(&self) -> String {
        format_clock(self.modified)
    }
}

/// Root-level dot entries are skipped; nested ones are kept. Infrastructure
/// directories are pruned at any depth.
fn keep_entry(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.depth() == 1 && name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && is_infra_dir(&name))
}

/// Walk `root` and return up to `limit` regular files whose mtime is at or
/// after `since`, newest first. Unreadable entries are skipped.
pub fn get_recent_files(
    root: &Path,
    since: SystemTime,
    limit: usize,
    diags: &Diagnostics,
) -> Vec<RecentFile> {
    let mut files: Vec<RecentFile> = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(keep_entry)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                diags.note(DiagnosticKind::Scan, format!("skipping entry: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = match entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|m| m.modified())
        {
            Ok(modified) => modified,
            Err(e) => {
                diags.note(
                    DiagnosticKind::Scan,
                    format!("no mtime for {}: {e}", entry.path().display()),
                );
                continue;
            }
        };
        if modified >= since {
            files.push(RecentFile {
                path: relative_slash_path(entry.path(), root),
                modified,
            });
        }
    }

    // newest first; ties broken by path so output is stable
    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
    files.truncate(limit);
    files
}

/// Drop files this session already tracked, leaving only external changes
pub fn exclude_tracked(files: Vec<RecentFile>, tracked: &FileAccessMap) -> Vec<RecentFile> {
    files
        .into_iter()
        .filter(|f| !tracked.contains_key(&f.path))
        .collect()
}

/// Modification time of a project file as `HH:MM`, or None if it is gone
pub fn get_file_mtime(root: &Path, rel_path: &str) -> Option<String> {
    let path = root.join(rel_path);
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(format_clock(modified))
}
