use std::path::Path;
use std::process::Command;

use fxbuild_core::normalize_branch;

/// Version-control state a release is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMetadata {
    /// `git rev-parse --short HEAD`
    pub commit: String,
    /// `git remote get-url origin`
    pub remote_url: String,
    /// `git rev-parse --abbrev-ref HEAD`, separators replaced with `-`
    pub branch: String,
}

impl GitMetadata {
    /// Resolve commit, origin URL and branch for the checkout at `repo_dir`.
    ///
    /// There is no fallback: a missing git binary, a directory outside a
    /// repository, or a repository without an `origin` remote all fail.
    pub fn resolve(repo_dir: &Path) -> Result<Self, GitError> {
        let commit = git_output(repo_dir, &["rev-parse", "--short", "HEAD"])?;
        let remote_url = git_output(repo_dir, &["remote", "get-url", "origin"])?;
        let branch = normalize_branch(&git_output(
            repo_dir,
            &["rev-parse", "--abbrev-ref", "HEAD"],
        )?);

        tracing::debug!(%commit, %remote_url, %branch, "git metadata resolved");

        Ok(Self {
            commit,
            remote_url,
            branch,
        })
    }
}

/// Run a git command in `dir` and return its trimmed stdout.
fn git_output(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::GitCommand {
            detail: format!("failed to execute git {}", args.join(" ")),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::GitFailed {
            detail: format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            ),
        });
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| GitError::InvalidUtf8 {
        detail: format!("git {}", args.join(" ")),
        source: e,
    })?;
    Ok(stdout.trim().to_owned())
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
    #[error("{detail} produced non UTF-8 output")]
    InvalidUtf8 {
        detail: String,
        source: std::string::FromUtf8Error,
    },
}
