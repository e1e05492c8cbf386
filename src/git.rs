//! Revision-control queries for build metadata
//!
//! Two independent queries: the short commit id and the descriptive tag of
//! the working tree. Each returns its own `Result` so the reconciler can
//! substitute a sentinel for one without suppressing the other. Calls block
//! with no timeout; git is expected to be local and fast.

use std::io;
use std::path::Path;
use std::process::Command;

/// Error types for git queries
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to invoke git: {0}")]
    Spawn(#[from] io::Error),

    #[error("git {command} exited with status {status}")]
    CommandFailed { command: &'static str, status: i32 },

    #[error("git {command} output was not valid UTF-8")]
    InvalidOutput { command: &'static str },
}

/// Short commit id of HEAD (`git rev-parse --short HEAD`)
pub fn short_commit(repo_dir: &Path) -> Result<String, GitError> {
    run_git(repo_dir, &["rev-parse", "--short", "HEAD"], "rev-parse")
}

/// Descriptive tag of the working tree (`git describe --tags --dirty`).
///
/// Fails when no tag exists, not only when the repository is absent.
pub fn describe(repo_dir: &Path) -> Result<String, GitError> {
    run_git(repo_dir, &["describe", "--tags", "--dirty"], "describe")
}

fn run_git(repo_dir: &Path, args: &[&str], command: &'static str) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command,
            status: output.status.code().unwrap_or(-1),
        });
    }

    let stdout =
        String::from_utf8(output.stdout).map_err(|_| GitError::InvalidOutput { command })?;
    Ok(stdout.trim().to_string())
}
