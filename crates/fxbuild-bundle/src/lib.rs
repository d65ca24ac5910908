//! Git metadata, esbuild plan assembly, and build extensions for fxbuild.
//!
//! # Build pipeline
//!
//! ```text
//! fxbuild build
//!   1. Metadata   ── git rev-parse / remote get-url → GitMetadata
//!   2. Identity   ── wrangler.toml name + GitMetadata + now → ReleaseIdentity
//!   3. Constants  ── BuildEnv + ReleaseIdentity → ConstantMap
//!   4. Plan       ── BundlePlan::new + attach_extensions
//!   5. Execute    ── esbuild, then each attached plugin
//! ```
//!
//! This crate covers steps 1 and 4. Nothing here spawns esbuild; see
//! `fxbuild-exec` for execution.

pub mod extension;
pub mod git;
pub mod plan;

pub use extension::{BuildExtension, ExtensionContext, SentryReleaseExtension, default_extensions};
pub use git::{GitError, GitMetadata};
pub use plan::{BundlePlan, Format, Plugin, ReleaseOptions, SentryReleaseOptions, SetCommits, SourceMap};
