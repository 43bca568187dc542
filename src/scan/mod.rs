// src/scan/mod.rs
// Read-only filesystem scans: recent changes and the project tree

pub mod recent;
pub mod tree;

pub use recent::{RecentFile, exclude_tracked, get_file_mtime, get_recent_files};
pub use tree::{DirectorySummary, TreeNode, build_tree, render_tree, summarize_tree};
