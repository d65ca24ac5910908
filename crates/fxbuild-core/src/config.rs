use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// fxbuild.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FxbuildConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub release: ReleaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Worker name used when `wrangler_config` has no usable `name`
    #[serde(default = "default_worker_name")]
    pub default_name: String,
    /// Wrangler configuration the worker name is read from
    #[serde(default = "default_wrangler_config")]
    pub wrangler_config: PathBuf,
    /// Dotenv file merged into the environment snapshot
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// The single entry point handed to esbuild
    #[serde(default = "default_entry_point")]
    pub entry_point: PathBuf,
    /// Output directory for the bundle and its source map
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    /// Explicit esbuild binary. When None, `node_modules/.bin/esbuild`
    /// is preferred and `esbuild` on PATH is the fallback.
    #[serde(default)]
    pub esbuild: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// sentry-cli binary used by the release plugin
    #[serde(default = "default_sentry_cli")]
    pub sentry_cli: PathBuf,
    /// Upload the external source maps to the release
    #[serde(default = "default_true")]
    pub upload_sourcemaps: bool,
    /// Finalize the release after uploading
    #[serde(default = "default_true")]
    pub finalize: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_name: default_worker_name(),
            wrangler_config: default_wrangler_config(),
            env_file: default_env_file(),
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point(),
            outdir: default_outdir(),
            esbuild: None,
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            sentry_cli: default_sentry_cli(),
            upload_sourcemaps: true,
            finalize: true,
        }
    }
}

impl FxbuildConfig {
    /// Load from fxbuild.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join("fxbuild.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no fxbuild.toml, using defaults");
            Ok(Self::default())
        }
    }
}

impl BundleConfig {
    /// Resolve the esbuild binary relative to `project_dir`.
    pub fn esbuild_path(&self, project_dir: &Path) -> PathBuf {
        if let Some(explicit) = &self.esbuild {
            return program_path(project_dir, explicit);
        }
        let local = project_dir.join("node_modules").join(".bin").join("esbuild");
        if local.exists() {
            local
        } else {
            PathBuf::from("esbuild")
        }
    }
}

impl ReleaseConfig {
    /// Resolve the sentry-cli binary relative to `project_dir`.
    pub fn sentry_cli_path(&self, project_dir: &Path) -> PathBuf {
        program_path(project_dir, &self.sentry_cli)
    }
}

/// Bare program names are looked up on PATH; anything with a directory
/// component is taken relative to the project.
///
/// Pass an absolute `project_dir`: children run with it as their working
/// directory, so a relative result would be resolved twice.
fn program_path(project_dir: &Path, program: &Path) -> PathBuf {
    if program.components().count() > 1 || program.is_absolute() {
        project_dir.join(program)
    } else {
        program.to_path_buf()
    }
}

fn default_worker_name() -> String {
    "fixtweet".to_owned()
}

fn default_wrangler_config() -> PathBuf {
    PathBuf::from("wrangler.toml")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_entry_point() -> PathBuf {
    PathBuf::from("src/worker.ts")
}

fn default_outdir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_sentry_cli() -> PathBuf {
    PathBuf::from("sentry-cli")
}

fn default_true() -> bool {
    true
}
