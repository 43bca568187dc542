// src/main.rs
// metacog - hook entry point and debug commands

use anyhow::Result;
use clap::Parser;
use metacog::cli::{Cli, Commands, run_debug_git, run_debug_state, run_debug_tree};
use metacog::config::MetacogConfig;
use metacog::diagnostics::{DiagnosticKind, Diagnostics};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = MetacogConfig::config_path();
    let loaded = MetacogConfig::try_load_from(&config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => MetacogConfig::default(),
    };

    // stdout belongs to the host payload, so logs go to stderr
    let log_level = config
        .tracing_level()
        .unwrap_or_else(|| cli.command.default_log_level());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let diagnostics = Diagnostics::new();
    if let Err(e) = &loaded {
        diagnostics.warn(
            DiagnosticKind::Config,
            format!(
                "failed to parse {}, using defaults: {e}",
                config_path.display()
            ),
        );
    }

    match cli.command {
        Commands::Hook { action } => {
            // a failing hook must never fail the host's turn
            if let Err(e) = metacog::hooks::run(action, config, diagnostics).await {
                tracing::warn!("{} hook failed: {e:#}", action.event_name());
            }
        }
        Commands::DebugTree { path, depth } => {
            run_debug_tree(path, depth, &config)?;
        }
        Commands::DebugGit { path } => {
            run_debug_git(path, &config).await?;
        }
        Commands::DebugState { session, path } => {
            run_debug_state(&session, path, config)?;
        }
    }

    Ok(())
}
