use std::fmt;
use std::path::PathBuf;

use fxbuild_core::{BundleConfig, ConstantMap, ReleaseIdentity};
use secrecy::SecretString;

use crate::extension::{BuildExtension, ExtensionContext};

/// How esbuild emits source maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMap {
    /// Separate `.map` file, no `sourceMappingURL` comment in the bundle.
    External,
}

impl SourceMap {
    fn as_arg(self) -> &'static str {
        match self {
            Self::External => "external",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Esm,
}

impl Format {
    fn as_arg(self) -> &'static str {
        match self {
            Self::Esm => "esm",
        }
    }
}

/// A single esbuild pass plus the plugins that run around it.
#[derive(Debug, Clone)]
pub struct BundlePlan {
    pub entry_point: PathBuf,
    pub outdir: PathBuf,
    pub sourcemap: SourceMap,
    pub minify: bool,
    pub bundle: bool,
    pub format: Format,
    pub defines: ConstantMap,
    pub plugins: Vec<Plugin>,
}

impl BundlePlan {
    /// Base plan with no plugins attached.
    pub fn new(config: &BundleConfig, defines: ConstantMap) -> Self {
        Self {
            entry_point: config.entry_point.clone(),
            outdir: config.outdir.clone(),
            sourcemap: SourceMap::External,
            minify: true,
            bundle: true,
            format: Format::Esm,
            defines,
            plugins: Vec::new(),
        }
    }

    /// Attach every extension whose capability check passes, in order.
    pub fn attach_extensions(
        &mut self,
        extensions: &[Box<dyn BuildExtension>],
        ctx: &ExtensionContext<'_>,
    ) {
        for ext in extensions {
            if ext.applies(ctx.env) {
                tracing::info!(extension = ext.name(), "attaching build extension");
                ext.attach(ctx, self);
            } else {
                tracing::debug!(extension = ext.name(), "build extension skipped");
            }
        }
    }

    /// Command-line arguments for the esbuild binary.
    ///
    /// Defines are passed as `--define:NAME=<literal>`; no shell is
    /// involved, so the literal's quotes reach esbuild as-is.
    pub fn esbuild_args(&self) -> Vec<String> {
        let mut args = vec![self.entry_point.display().to_string()];
        if self.bundle {
            args.push("--bundle".to_owned());
        }
        if self.minify {
            args.push("--minify".to_owned());
        }
        args.push(format!("--format={}", self.format.as_arg()));
        args.push(format!("--sourcemap={}", self.sourcemap.as_arg()));
        args.push(format!("--outdir={}", self.outdir.display()));
        args.extend(
            self.defines
                .iter()
                .map(|(name, literal)| format!("--define:{name}={literal}")),
        );
        args
    }
}

/// A plugin attached to the bundle pass.
#[derive(Debug, Clone)]
pub enum Plugin {
    SentryRelease(SentryReleaseOptions),
}

impl Plugin {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SentryRelease(_) => "sentry-release",
        }
    }
}

/// Release-tracking plugin configuration.
#[derive(Clone)]
pub struct SentryReleaseOptions {
    pub org: Option<String>,
    pub project: Option<String>,
    pub auth_token: Option<SecretString>,
    /// The plugin's own usage reporting; always off. Informational only:
    /// sentry-cli has no such reporting, so no step reads this.
    pub telemetry: bool,
    pub release: ReleaseOptions,
}

impl fmt::Debug for SentryReleaseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentryReleaseOptions")
            .field("org", &self.org)
            .field("project", &self.project)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("telemetry", &self.telemetry)
            .field("release", &self.release)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub name: ReleaseIdentity,
    /// Create the release before associating commits.
    pub create: bool,
    /// Mark the release finalized once artifacts are uploaded.
    pub finalize: bool,
    /// Upload the external source maps from the output directory.
    pub upload_sourcemaps: bool,
    /// Remote the commit range is resolved against.
    pub vcs_remote: String,
    pub set_commits: SetCommits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCommits {
    /// Detect the commit range from the previous release.
    pub auto: bool,
    /// Proceed when the previous release's commit is unknown.
    pub ignore_missing: bool,
}
