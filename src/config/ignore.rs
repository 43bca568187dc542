// src/config/ignore.rs
// Centralized directory ignore lists

/// Infrastructure directories pruned from every walk: version control,
/// dependency stores, build caches, and virtual environments.
pub const INFRA_SKIP: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "target",
    "dist",
    "build",
    ".next",
    ".turbo",
    ".cache",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".tox",
    "venv",
    ".venv",
];

/// The single dot-prefixed name the project tree keeps visible.
pub const TREE_ALLOW_HIDDEN: &str = ".claude";

/// Check if a directory is infrastructure that should never be walked
pub fn is_infra_dir(name: &str) -> bool {
    INFRA_SKIP.contains(&name)
}

/// Check if an entry is hidden from the project tree
pub fn is_hidden_in_tree(name: &str) -> bool {
    name.starts_with('.') && name != TREE_ALLOW_HIDDEN
}
