use std::path::Path;
use std::process::Command;

use chrono::{TimeZone, Utc};
use fxbuild_bundle::git::GitMetadata;
use fxbuild_bundle::{BundlePlan, ExtensionContext, Plugin, default_extensions};
use fxbuild_core::{BuildEnv, BundleConfig, ConstantMap, RELEASE_NAME, ReleaseConfig, ReleaseIdentity};
use secrecy::ExposeSecret;
use tempfile::TempDir;

const ORIGIN: &str = "https://github.com/FixTweet/FxTwitter.git";

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {args:?} failed");
}

/// Initialize a git repo with an origin remote and an initial commit.
fn init_git_project(dir: &Path) {
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(dir.join("wrangler.toml"), "name = \"fixtweet\"\n").unwrap();
    std::fs::write(dir.join("src/worker.ts"), "export default {};\n").unwrap();

    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["remote", "add", "origin", ORIGIN]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "init"]);
}

fn release() -> ReleaseIdentity {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
    ReleaseIdentity::derive("fixtweet", "main", "abc1234", at)
}

fn metadata() -> GitMetadata {
    GitMetadata {
        commit: "abc1234".to_owned(),
        remote_url: ORIGIN.to_owned(),
        branch: "main".to_owned(),
    }
}

fn plan_for(env: &BuildEnv) -> BundlePlan {
    let release = release();
    let git = metadata();
    let release_config = ReleaseConfig::default();
    let ctx = ExtensionContext {
        env,
        release: &release,
        git: &git,
        release_config: &release_config,
    };

    let mut plan = BundlePlan::new(
        &BundleConfig::default(),
        ConstantMap::materialize(env, &release),
    );
    plan.attach_extensions(&default_extensions(), &ctx);
    plan
}

// ── Git Metadata Tests ──

#[test]
fn resolves_commit_remote_and_branch() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    git(tmp.path(), &["checkout", "-b", "release"]);

    let meta = GitMetadata::resolve(tmp.path()).unwrap();

    assert_eq!(meta.remote_url, ORIGIN);
    assert_eq!(meta.branch, "release");
    assert!(meta.commit.len() >= 7, "got: {}", meta.commit);
    assert!(meta.commit.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn branch_separators_are_normalized() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    git(tmp.path(), &["checkout", "-b", "feature/foo"]);

    let meta = GitMetadata::resolve(tmp.path()).unwrap();
    assert_eq!(meta.branch, "feature-foo");
}

#[test]
fn outside_repository_fails() {
    let tmp = TempDir::new().unwrap();

    let err = GitMetadata::resolve(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("git"), "got: {err}");
}

#[test]
fn missing_origin_fails() {
    let tmp = TempDir::new().unwrap();
    init_git_project(tmp.path());
    git(tmp.path(), &["remote", "remove", "origin"]);

    assert!(GitMetadata::resolve(tmp.path()).is_err());
}

// ── Plan Tests ──

#[test]
fn esbuild_args_match_fixed_pass() {
    let plan = plan_for(&BuildEnv::default());
    let args = plan.esbuild_args();

    assert_eq!(args[0], "src/worker.ts");
    assert!(args.contains(&"--bundle".to_owned()));
    assert!(args.contains(&"--minify".to_owned()));
    assert!(args.contains(&"--format=esm".to_owned()));
    assert!(args.contains(&"--sourcemap=external".to_owned()));
    assert!(args.contains(&"--outdir=dist".to_owned()));
}

#[test]
fn esbuild_args_carry_every_define() {
    let env = BuildEnv::from_pairs([("HOST_URL", "https://fxtwitter.com")]);
    let plan = plan_for(&env);
    let args = plan.esbuild_args();

    let defines: Vec<_> = args.iter().filter(|a| a.starts_with("--define:")).collect();
    assert_eq!(defines.len(), plan.defines.len());
    assert!(args.contains(&"--define:HOST_URL=\"https://fxtwitter.com\"".to_owned()));
    assert!(args.contains(&"--define:SENTRY_DSN=\"undefined\"".to_owned()));
    assert!(args.contains(&format!("--define:{RELEASE_NAME}=\"{}\"", release())));
}

#[test]
fn no_plugins_without_dsn() {
    let env = BuildEnv::from_pairs([
        ("SENTRY_ORG", "fixtweet"),
        ("SENTRY_PROJECT", "worker"),
        ("SENTRY_AUTH_TOKEN", "sntrys_x"),
    ]);
    let plan = plan_for(&env);
    assert!(plan.plugins.is_empty());
}

#[test]
fn one_sentry_plugin_with_dsn() {
    let env = BuildEnv::from_pairs([
        ("SENTRY_DSN", "https://key@o0.ingest.sentry.io/0"),
        ("SENTRY_ORG", "fixtweet"),
        ("SENTRY_PROJECT", "worker"),
        ("SENTRY_AUTH_TOKEN", "sntrys_x"),
    ]);
    let plan = plan_for(&env);

    assert_eq!(plan.plugins.len(), 1);
    let Plugin::SentryRelease(opts) = &plan.plugins[0];
    assert_eq!(opts.org.as_deref(), Some("fixtweet"));
    assert_eq!(opts.project.as_deref(), Some("worker"));
    assert_eq!(
        opts.auth_token.as_ref().map(|t| t.expose_secret()),
        Some("sntrys_x")
    );
    assert!(!opts.telemetry);
    assert_eq!(opts.release.name, release());
    assert!(opts.release.create);
    assert_eq!(opts.release.vcs_remote, ORIGIN);
    assert!(opts.release.set_commits.auto);
    assert!(opts.release.set_commits.ignore_missing);
}

#[test]
fn sentry_plugin_debug_redacts_token() {
    let env = BuildEnv::from_pairs([
        ("SENTRY_DSN", "https://key@o0.ingest.sentry.io/0"),
        ("SENTRY_AUTH_TOKEN", "sntrys_secret"),
    ]);
    let plan = plan_for(&env);

    let debug = format!("{:?}", plan.plugins);
    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("sntrys_secret"));
}
