// src/git/mod.rs
// Best-effort repository status for workspaces holding several repositories
//
// - command: bounded `git` subprocess calls
// - probe: discovery, branch, activity, and ahead/behind per repository

mod command;
mod probe;

pub use command::git_cmd;
pub use probe::{
    GitRepoInfo, find_repos, last_activity, probe_workspace, read_branch, render_git_block,
};
