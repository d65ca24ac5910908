//! Release naming.
//!
//! A release identifier tags one build output so error reports can be
//! traced back to the exact revision that produced them:
//!
//! ```text
//! {worker}-{branch}-{commit}-{YYYY-MM-DDTHH:MM:SS}
//! fixtweet-feature-foo-1a2b3c4-2024-05-01T12:30:45
//! ```

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Matches the first `name = "..."` assignment in a wrangler config.
static WORKER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name ?= ?"(.+?)""#).expect("valid worker name pattern"));

/// Read the worker name from a wrangler config, falling back to `default`.
///
/// Any read error or missing assignment is logged and recovered from.
pub fn worker_name(wrangler_config: &Path, default: &str) -> String {
    let content = match std::fs::read_to_string(wrangler_config) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                path = %wrangler_config.display(),
                error = %e,
                "failed to read worker name, using '{default}' instead"
            );
            return default.to_owned();
        }
    };

    match parse_worker_name(&content) {
        Some(name) => name.to_owned(),
        None => {
            tracing::warn!(
                path = %wrangler_config.display(),
                "no worker name found, using '{default}' instead"
            );
            default.to_owned()
        }
    }
}

/// Extract the first `name = "..."` value from config text.
pub fn parse_worker_name(content: &str) -> Option<&str> {
    WORKER_NAME
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Replace path separators so a branch name is usable inside a release tag.
pub fn normalize_branch(branch: &str) -> String {
    branch.replace(['/', '\\'], "-")
}

/// The release identifier for one build invocation.
///
/// Derive it once and share it; every consumer of the same build must
/// see the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseIdentity(String);

impl ReleaseIdentity {
    /// Timestamp layout: ISO 8601 truncated to seconds, no offset.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S";

    /// Combine worker name, branch, short commit and build time.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fxbuild_core::ReleaseIdentity;
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
    /// let id = ReleaseIdentity::derive("fixtweet", "feature/foo", "1a2b3c4", at);
    /// assert_eq!(id.as_str(), "fixtweet-feature-foo-1a2b3c4-2024-05-01T12:30:45");
    /// ```
    pub fn derive(worker: &str, branch: &str, commit: &str, at: DateTime<Utc>) -> Self {
        Self(format!(
            "{worker}-{branch}-{commit}-{timestamp}",
            branch = normalize_branch(branch),
            timestamp = at.format(Self::TIMESTAMP_FORMAT),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReleaseIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
