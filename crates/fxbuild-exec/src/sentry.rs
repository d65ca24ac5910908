//! Release upload through `sentry-cli`.
//!
//! Mirrors what the release-tracking plugin does after a build:
//!
//! ```text
//! sentry-cli releases new <release>
//! sentry-cli releases set-commits <release> --auto --ignore-missing
//! sentry-cli sourcemaps upload --release <release> <outdir>
//! sentry-cli releases finalize <release>
//! ```
//!
//! Organization, project, token and remote travel through the child's
//! environment so the token never appears in argv or error messages.

use std::path::Path;

use fxbuild_bundle::SentryReleaseOptions;
use secrecy::ExposeSecret;

use crate::error::ExecError;
use crate::executor::CommandExecutor;

/// One sentry-cli invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStep {
    pub label: &'static str,
    pub args: Vec<String>,
}

/// The sentry-cli invocations for `opts`, in execution order.
pub fn release_steps(opts: &SentryReleaseOptions, outdir: &Path) -> Vec<ReleaseStep> {
    let release = &opts.release;
    let name = release.name.to_string();
    let mut steps = Vec::new();

    if release.create {
        steps.push(ReleaseStep {
            label: "create release",
            args: args(["releases", "new", &name]),
        });
    }

    if release.set_commits.auto {
        let mut set_commits = args(["releases", "set-commits", &name, "--auto"]);
        if release.set_commits.ignore_missing {
            set_commits.push("--ignore-missing".to_owned());
        }
        steps.push(ReleaseStep {
            label: "associate commits",
            args: set_commits,
        });
    }

    if release.upload_sourcemaps {
        steps.push(ReleaseStep {
            label: "upload source maps",
            args: args([
                "sourcemaps",
                "upload",
                "--release",
                &name,
                &outdir.display().to_string(),
            ]),
        });
    }

    if release.finalize {
        steps.push(ReleaseStep {
            label: "finalize release",
            args: args(["releases", "finalize", &name]),
        });
    }

    steps
}

/// Child environment carrying org, project, token and remote.
pub fn release_env(opts: &SentryReleaseOptions) -> Vec<(String, String)> {
    let mut envs = vec![("SENTRY_VCS_REMOTE".to_owned(), opts.release.vcs_remote.clone())];
    if let Some(org) = &opts.org {
        envs.push(("SENTRY_ORG".to_owned(), org.clone()));
    }
    if let Some(project) = &opts.project {
        envs.push(("SENTRY_PROJECT".to_owned(), project.clone()));
    }
    if let Some(token) = &opts.auth_token {
        envs.push((
            "SENTRY_AUTH_TOKEN".to_owned(),
            token.expose_secret().to_owned(),
        ));
    }
    envs
}

/// Credential variables the release cannot be created without.
pub fn missing_credentials(opts: &SentryReleaseOptions) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if opts.auth_token.is_none() {
        missing.push("SENTRY_AUTH_TOKEN");
    }
    if opts.org.is_none() {
        missing.push("SENTRY_ORG");
    }
    if opts.project.is_none() {
        missing.push("SENTRY_PROJECT");
    }
    missing
}

/// Run every release step, stopping at the first failure.
///
/// Without credentials the upload is skipped with a warning and the
/// build still succeeds.
pub async fn upload_release<E: CommandExecutor>(
    executor: &E,
    sentry_cli: &Path,
    opts: &SentryReleaseOptions,
    outdir: &Path,
) -> Result<Vec<String>, ReleaseError> {
    let missing = missing_credentials(opts);
    if !missing.is_empty() {
        tracing::warn!(
            release = %opts.release.name,
            missing = %missing.join(", "),
            "skipping sentry release: credentials not set"
        );
        return Ok(vec![format!(
            "Sentry: skipped (missing {})",
            missing.join(", ")
        )]);
    }

    let envs = release_env(opts);
    let mut done = Vec::new();

    for step in release_steps(opts, outdir) {
        tracing::info!(release = %opts.release.name, step = step.label, "sentry-cli");
        let output = executor
            .exec(sentry_cli, &step.args, &envs)
            .await
            .map_err(|e| ReleaseError::Step {
                step: step.label,
                source: e,
            })?;
        tracing::debug!(step = step.label, output = %output.trim(), "sentry-cli finished");
        done.push(format!("Sentry: {}", step.label));
    }

    Ok(done)
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("sentry release step '{step}' failed")]
    Step {
        step: &'static str,
        source: ExecError,
    },
}
