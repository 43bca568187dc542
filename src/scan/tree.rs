// src/scan/tree.rs
// Bounded-depth project tree with extension histograms for collapsed directories

use crate::config::ignore::{is_hidden_in_tree, is_infra_dir};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Default depth at which directories collapse into summaries
pub const DEFAULT_TREE_DEPTH: usize = 2;

/// Extensions shown individually before the rest roll up into `+N`
const TOP_EXTENSIONS: usize = 4;

/// Aggregate of every file below a collapsed directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    /// `.ext` -> count; extensionless files are keyed by file name
    pub extension_counts: BTreeMap<String, usize>,
    pub newest_mtime: Option<SystemTime>,
}

impl DirectorySummary {
    /// Walk every descendant of `dir`, applying the same pruning as the tree
    pub fn collect(dir: &Path, diags: &Diagnostics) -> Self {
        let mut summary = Self::default();

        let walker = WalkDir::new(dir).min_depth(1).into_iter().filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if is_hidden_in_tree(&name) {
                return false;
            }
            !(e.file_type().is_dir() && is_infra_dir(&name))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    diags.note(DiagnosticKind::Scan, format!("summary skip: {e}"));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            *summary
                .extension_counts
                .entry(extension_key(entry.path()))
                .or_insert(0) += 1;

            if let Ok(modified) = entry.metadata().map_err(std::io::Error::from).and_then(|m| m.modified())
                && summary.newest_mtime.is_none_or(|newest| modified > newest)
            {
                summary.newest_mtime = Some(modified);
            }
        }

        summary
    }

    pub fn total_files(&self) -> usize {
        self.extension_counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_counts.is_empty()
    }

    /// Up to `n` extensions by count (ties alphabetical), plus the number of
    /// files under all remaining extensions
    pub fn top_extensions(&self, n: usize) -> (Vec<(&str, usize)>, usize) {
        let mut ranked: Vec<(&str, usize)> = self
            .extension_counts
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let rest = ranked.iter().skip(n).map(|(_, count)| count).sum();
        ranked.truncate(n);
        (ranked, rest)
    }

    /// `[5 .ts, 1 .md] (14:32)`, or `(empty)` when there are no files
    pub fn render(&self, now: DateTime<Local>) -> String {
        if self.is_empty() {
            return "(empty)".to_string();
        }

        let (top, rest) = self.top_extensions(TOP_EXTENSIONS);
        let mut parts: Vec<String> = top
            .iter()
            .map(|(ext, count)| format!("{count} {ext}"))
            .collect();
        if rest > 0 {
            parts.push(format!("+{rest}"));
        }

        let mut out = format!("[{}]", parts.join(", "));
        if let Some(newest) = self.newest_mtime {
            out.push_str(&format!(" ({})", crate::utils::format_freshness(newest, now)));
        }
        out
    }
}

fn extension_key(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// One entry in the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File {
        name: String,
    },
    Dir {
        name: String,
        children: Vec<TreeNode>,
    },
    /// Directory at the depth limit, shown as a single summarized leaf
    Collapsed {
        name: String,
        summary: DirectorySummary,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name } | TreeNode::Dir { name, .. } | TreeNode::Collapsed { name, .. } => {
                name
            }
        }
    }

    fn is_dir(&self) -> bool {
        !matches!(self, TreeNode::File { .. })
    }
}

/// Build the tree below `root`. Root children sit at depth 1; directories
/// reaching `max_depth` collapse into summaries.
pub fn build_tree(root: &Path, max_depth: usize, diags: &Diagnostics) -> Vec<TreeNode> {
    read_level(root, 1, max_depth.max(1), diags)
}

fn read_level(dir: &Path, depth: usize, max_depth: usize, diags: &Diagnostics) -> Vec<TreeNode> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            diags.note(
                DiagnosticKind::Scan,
                format!("cannot list {}: {e}", dir.display()),
            );
            return Vec::new();
        }
    };

    let mut nodes = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden_in_tree(&name) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if is_infra_dir(&name) {
                continue;
            }
            let path = entry.path();
            if depth >= max_depth {
                let summary = DirectorySummary::collect(&path, diags);
                nodes.push(TreeNode::Collapsed { name, summary });
            } else {
                let children = read_level(&path, depth + 1, max_depth, diags);
                nodes.push(TreeNode::Dir { name, children });
            }
        } else {
            nodes.push(TreeNode::File { name });
        }
    }

    nodes.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
            .then_with(|| a.name().cmp(b.name()))
    });
    nodes
}

/// Draw the tree with branch and elbow connectors under a `root_name/` line
pub fn render_tree(root_name: &str, nodes: &[TreeNode], now: DateTime<Local>) -> String {
    let mut lines = vec![format!("{root_name}/")];
    render_level(nodes, "", now, &mut lines);
    lines.join("\n")
}

fn render_level(nodes: &[TreeNode], prefix: &str, now: DateTime<Local>, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let connector = if last { "└── " } else { "├── " };

        match node {
            TreeNode::File { name } => lines.push(format!("{prefix}{connector}{name}")),
            TreeNode::Collapsed { name, summary } => {
                lines.push(format!("{prefix}{connector}{name}/ {}", summary.render(now)))
            }
            TreeNode::Dir { name, children } => {
                lines.push(format!("{prefix}{connector}{name}/"));
                let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
                render_level(children, &child_prefix, now, lines);
            }
        }
    }
}

/// Build and render the tree for `root` in one step
pub fn summarize_tree(root: &Path, max_depth: usize, diags: &Diagnostics) -> String {
    let nodes = build_tree(root, max_depth, diags);
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    render_tree(&root_name, &nodes, Local::now())
}
