//! Conditional build extensions.
//!
//! An extension decides from the environment snapshot whether it takes
//! part in a build, and if so mutates the [`BundlePlan`]. The invoker
//! never branches on individual extensions.

use fxbuild_core::{BuildEnv, ReleaseConfig, ReleaseIdentity};
use secrecy::SecretString;

use crate::git::GitMetadata;
use crate::plan::{BundlePlan, Plugin, ReleaseOptions, SentryReleaseOptions, SetCommits};

/// Everything an extension may read while attaching.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionContext<'a> {
    pub env: &'a BuildEnv,
    pub release: &'a ReleaseIdentity,
    pub git: &'a GitMetadata,
    pub release_config: &'a ReleaseConfig,
}

pub trait BuildExtension: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this extension participates in the build.
    fn applies(&self, env: &BuildEnv) -> bool;

    /// Add this extension's contribution to the plan.
    fn attach(&self, ctx: &ExtensionContext<'_>, plan: &mut BundlePlan);
}

/// Extensions known to fxbuild, in attachment order.
pub fn default_extensions() -> Vec<Box<dyn BuildExtension>> {
    vec![Box::new(SentryReleaseExtension)]
}

/// Creates a Sentry release for the build when a DSN is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryReleaseExtension;

impl SentryReleaseExtension {
    pub const DSN_VAR: &'static str = "SENTRY_DSN";
    pub const ORG_VAR: &'static str = "SENTRY_ORG";
    pub const PROJECT_VAR: &'static str = "SENTRY_PROJECT";
    pub const AUTH_TOKEN_VAR: &'static str = "SENTRY_AUTH_TOKEN";
}

impl BuildExtension for SentryReleaseExtension {
    fn name(&self) -> &'static str {
        "sentry-release"
    }

    fn applies(&self, env: &BuildEnv) -> bool {
        env.is_set(Self::DSN_VAR)
    }

    fn attach(&self, ctx: &ExtensionContext<'_>, plan: &mut BundlePlan) {
        let options = SentryReleaseOptions {
            org: ctx.env.get_owned(Self::ORG_VAR),
            project: ctx.env.get_owned(Self::PROJECT_VAR),
            auth_token: ctx.env.get_owned(Self::AUTH_TOKEN_VAR).map(SecretString::from),
            telemetry: false,
            release: ReleaseOptions {
                name: ctx.release.clone(),
                create: true,
                finalize: ctx.release_config.finalize,
                upload_sourcemaps: ctx.release_config.upload_sourcemaps,
                vcs_remote: ctx.git.remote_url.clone(),
                set_commits: SetCommits {
                    auto: true,
                    ignore_missing: true,
                },
            },
        };

        plan.plugins.push(Plugin::SentryRelease(options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_only_with_non_empty_dsn() {
        let ext = SentryReleaseExtension;
        assert!(!ext.applies(&BuildEnv::default()));
        assert!(!ext.applies(&BuildEnv::from_pairs([("SENTRY_DSN", "")])));
        assert!(ext.applies(&BuildEnv::from_pairs([(
            "SENTRY_DSN",
            "https://key@o0.ingest.sentry.io/0"
        )])));
    }

    #[test]
    fn auth_token_alone_does_not_apply() {
        let env = BuildEnv::from_pairs([("SENTRY_AUTH_TOKEN", "sntrys_x")]);
        assert!(!SentryReleaseExtension.applies(&env));
    }

    #[test]
    fn default_extensions_contains_sentry() {
        let names: Vec<_> = default_extensions().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["sentry-release"]);
    }
}
