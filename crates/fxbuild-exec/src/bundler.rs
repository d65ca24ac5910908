use std::path::{Path, PathBuf};

use fxbuild_bundle::{BundlePlan, Plugin};
use fxbuild_core::FxbuildConfig;

use crate::error::ExecError;
use crate::esbuild::run_esbuild;
use crate::executor::{CommandExecutor, RealExecutor};
use crate::sentry::{ReleaseError, upload_release};

/// Result of a successful bundle run.
#[derive(Debug, Clone, Default)]
pub struct BundleOutcome {
    pub steps: Vec<String>,
}

/// Runs a [`BundlePlan`]: esbuild first, then every attached plugin.
///
/// Parameterized over the executor for testability.
pub struct Bundler<E: CommandExecutor = RealExecutor> {
    executor: E,
    esbuild: PathBuf,
    sentry_cli: PathBuf,
}

impl Bundler<RealExecutor> {
    /// `project_dir` should be absolute; it becomes the children's working
    /// directory and the base for project-relative binaries.
    pub fn new(project_dir: &Path, config: &FxbuildConfig) -> Self {
        Self {
            executor: RealExecutor::new(project_dir),
            esbuild: config.bundle.esbuild_path(project_dir),
            sentry_cli: config.release.sentry_cli_path(project_dir),
        }
    }
}

impl<E: CommandExecutor> Bundler<E> {
    pub fn with_executor(executor: E, esbuild: PathBuf, sentry_cli: PathBuf) -> Self {
        Self {
            executor,
            esbuild,
            sentry_cli,
        }
    }

    pub fn esbuild(&self) -> &Path {
        &self.esbuild
    }

    /// Bundle, then run plugins in attachment order.
    ///
    /// The first failure aborts; output already written to the output
    /// directory is left in place.
    pub async fn run(&self, plan: &BundlePlan) -> Result<BundleOutcome, BundleError> {
        let mut outcome = BundleOutcome::default();

        run_esbuild(&self.executor, &self.esbuild, plan)
            .await
            .map_err(|e| BundleError::Esbuild { source: e })?;
        outcome
            .steps
            .push(format!("Bundled {}", plan.entry_point.display()));

        for plugin in &plan.plugins {
            match plugin {
                Plugin::SentryRelease(opts) => {
                    let steps =
                        upload_release(&self.executor, &self.sentry_cli, opts, &plan.outdir)
                            .await
                            .map_err(|e| BundleError::Plugin {
                                plugin: plugin.name(),
                                source: e,
                            })?;
                    outcome.steps.extend(steps);
                }
            }
        }

        Ok(outcome)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("esbuild failed")]
    Esbuild { source: ExecError },

    #[error("plugin '{plugin}' failed")]
    Plugin {
        plugin: &'static str,
        source: ReleaseError,
    },
}
