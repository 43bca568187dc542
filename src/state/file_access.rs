// src/state/file_access.rs
// Per-path record of the file operations this session performed

use super::record::{AccessKind, FileAccessMap, SessionRecord};
use std::path::Path;

/// Normalize a tool-supplied path to a project-relative, forward-slash key.
///
/// Absolute paths under `project_root` are made relative; anything else is
/// kept as given. Separators are unified before comparing so Windows-style
/// input matches a Unix-style root and vice versa.
pub fn normalize_path(raw: &str, project_root: &Path) -> String {
    let path = raw.replace('\\', "/");
    let root = project_root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');

    let relative = if !root.is_empty() {
        strip_root(&path, root).unwrap_or(&path)
    } else {
        &path
    };

    let relative = relative.strip_prefix("./").unwrap_or(relative);
    relative.to_string()
}

fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let rest = if cfg!(windows) {
        // drive letters and directory names are case-insensitive there
        let head = path.get(..root.len())?;
        if !head.eq_ignore_ascii_case(root) {
            return None;
        }
        &path[root.len()..]
    } else {
        path.strip_prefix(root)?
    };
    // must end on a component boundary: /proj must not match /project
    let rest = rest.strip_prefix('/')?;
    if rest.is_empty() { None } else { Some(rest) }
}

/// Merge keys that only differ by separator style, unioning their kinds in
/// first-seen order.
pub fn renormalize(access: &FileAccessMap) -> FileAccessMap {
    let mut merged = FileAccessMap::with_capacity(access.len());
    for (path, kinds) in access {
        let key = path.replace('\\', "/");
        let entry = merged.entry(key).or_insert_with(Vec::new);
        for kind in kinds {
            if !entry.contains(kind) {
                entry.push(*kind);
            }
        }
    }
    merged
}

/// Kinds sorted by display priority (read, update, write) and joined with `+`
pub fn format_kinds(kinds: &[AccessKind]) -> String {
    let mut sorted = kinds.to_vec();
    sorted.sort_by_key(|k| k.priority());
    sorted
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join("+")
}

impl SessionRecord {
    /// Record one file operation against the record's access map
    pub fn record_access(&mut self, raw_path: &str, kind: AccessKind, project_root: &Path) {
        let path = normalize_path(raw_path, project_root);
        if path.is_empty() {
            return;
        }

        self.file_access = renormalize(&self.file_access);
        let kinds = self.file_access.entry(path).or_default();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
}
