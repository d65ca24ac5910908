//! Core types and configuration for fxbuild.
//!
//! This crate defines the `fxbuild.toml` schema ([`FxbuildConfig`]), the
//! environment snapshot ([`BuildEnv`]), release naming
//! ([`ReleaseIdentity`]), the compile-time constant schema
//! ([`ConstantMap`]), and shared error types.

pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod identity;

pub use config::{BundleConfig, FxbuildConfig, ProjectConfig, ReleaseConfig};
pub use constants::{
    Absence, CONSTANT_SCHEMA, ConstantMap, ConstantSource, ConstantSpec, RELEASE_NAME,
    UNDEFINED_MARKER,
};
pub use env::BuildEnv;
pub use error::{Error, Result};
pub use identity::{ReleaseIdentity, normalize_branch, parse_worker_name, worker_name};
