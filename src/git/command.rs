// src/git/command.rs
// Bounded git subprocess execution

use crate::error::MetacogError;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Validate that a git argument doesn't smuggle control characters
fn validate_arg(arg: &str) -> crate::Result<()> {
    if arg.contains('\0') || arg.contains('\n') || arg.contains('\r') {
        return Err(MetacogError::InvalidInput(format!(
            "git argument contains forbidden characters: {arg:?}"
        )));
    }
    Ok(())
}

/// Run a git command in `repo_dir` and return trimmed stdout.
///
/// The child is killed if the timeout fires, so a hung git (credential
/// prompt, huge index refresh) can never outlive the hook.
pub async fn git_cmd(repo_dir: &Path, args: &[&str], timeout: Duration) -> crate::Result<String> {
    for arg in args {
        validate_arg(arg)?;
    }
    let name = args.first().copied().unwrap_or_default();

    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_OPTIONAL_LOCKS", "0")
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, output)
        .await
        .map_err(|_| MetacogError::Timeout(timeout.as_secs()))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MetacogError::Other(format!(
            "git {name} failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
