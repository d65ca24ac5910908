use anyhow::Context;
use chrono::Utc;
use fxbuild_bundle::{BundlePlan, ExtensionContext, GitMetadata, default_extensions};
use fxbuild_core::{BuildEnv, ConstantMap, FxbuildConfig, ReleaseIdentity, worker_name};
use std::path::{Path, PathBuf};

/// Inputs resolved before anything is materialized or bundled.
pub(crate) struct Resolved {
    /// Canonical project directory; child processes run from here.
    pub project_dir: PathBuf,
    pub config: FxbuildConfig,
    pub env: BuildEnv,
    pub git: GitMetadata,
    pub release: ReleaseIdentity,
}

/// Load config, snapshot the environment, read git state, name the release.
///
/// Git failures abort here, before any constant is materialized.
pub(crate) fn resolve(project_dir: &Path) -> anyhow::Result<Resolved> {
    let canonical = project_dir.canonicalize().with_context(|| {
        format!("failed to resolve project directory {}", project_dir.display())
    })?;
    let project_dir = canonical.as_path();

    let config = FxbuildConfig::load(project_dir)?;
    let env = BuildEnv::capture(&project_dir.join(&config.project.env_file))?;

    let git = GitMetadata::resolve(project_dir)?;

    let worker = worker_name(
        &project_dir.join(&config.project.wrangler_config),
        &config.project.default_name,
    );
    // Taken once; every consumer of this build shares the same release.
    let release = ReleaseIdentity::derive(&worker, &git.branch, &git.commit, Utc::now());
    tracing::info!(%release, "release identified");

    Ok(Resolved {
        project_dir: project_dir.to_path_buf(),
        config,
        env,
        git,
        release,
    })
}

/// Materialize constants and assemble the bundle plan with extensions.
pub(crate) fn plan(resolved: &Resolved) -> BundlePlan {
    let defines = ConstantMap::materialize(&resolved.env, &resolved.release);

    let ctx = ExtensionContext {
        env: &resolved.env,
        release: &resolved.release,
        git: &resolved.git,
        release_config: &resolved.config.release,
    };

    let mut plan = BundlePlan::new(&resolved.config.bundle, defines);
    plan.attach_extensions(&default_extensions(), &ctx);
    plan
}
