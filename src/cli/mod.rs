// src/cli/mod.rs
// CLI surface for metacog commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod debug;

pub use debug::{run_debug_git, run_debug_state, run_debug_tree};

#[derive(Parser)]
#[command(name = "metacog")]
#[command(about = "Session bookkeeping and context reconstruction for assistant hooks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Host hook handlers (JSON on stdin, JSON on stdout)
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },

    /// Print the project tree as the fresh-session message shows it
    DebugTree {
        /// Project path (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Depth at which directories collapse
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Print git status for every repository below a workspace
    DebugGit {
        /// Workspace path (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Print the persisted record for a session
    DebugState {
        /// Session id
        #[arg(short, long)]
        session: String,

        /// Project path (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Handle SessionStart hooks - fresh orientation or post-compaction context
    SessionStart,
    /// Handle UserPromptSubmit hooks - task tracking and reflection nudge
    UserPrompt,
    /// Handle PostToolUse hooks - record file access
    PostTool,
    /// Handle Stop hooks - mark the task complete
    Stop,
    /// Handle PreCompact hooks - log the trigger
    PreCompact,
}

impl HookAction {
    /// Host event name echoed back in hook output
    pub fn event_name(&self) -> &'static str {
        match self {
            HookAction::SessionStart => "SessionStart",
            HookAction::UserPrompt => "UserPromptSubmit",
            HookAction::PostTool => "PostToolUse",
            HookAction::Stop => "Stop",
            HookAction::PreCompact => "PreCompact",
        }
    }
}

impl Commands {
    /// Hooks stay quiet on stderr; debug commands are chattier
    pub fn default_log_level(&self) -> tracing::Level {
        match self {
            Commands::Hook { .. } => tracing::Level::WARN,
            _ => tracing::Level::INFO,
        }
    }
}
