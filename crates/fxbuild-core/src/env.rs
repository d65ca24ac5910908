//! Read-only snapshot of the build environment.
//!
//! The process environment is captured exactly once, merged with the
//! project's dotenv file, and then handed to every pipeline stage by
//! reference. Nothing downstream calls `std::env::var` directly.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Environment variables visible to a single build invocation.
///
/// # Examples
///
/// ```
/// use fxbuild_core::BuildEnv;
///
/// let env = BuildEnv::from_pairs([("HOST_URL", "https://fxtwitter.com")]);
/// assert_eq!(env.get("HOST_URL"), Some("https://fxtwitter.com"));
/// assert!(!env.is_set("SENTRY_DSN"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
}

// Values may hold credentials, so only names are printed.
impl fmt::Debug for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildEnv")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BuildEnv {
    /// Capture the process environment, then fill gaps from `env_file`.
    ///
    /// Variables already present in the process win over the file. A
    /// missing file is not an error; an unreadable or malformed one is.
    pub fn capture(env_file: &Path) -> crate::Result<Self> {
        let mut env = Self::from_pairs(std::env::vars_os().filter_map(|(k, v)| {
            // arch-lint: allow(no-silent-result-drop) reason="non UTF-8 variables cannot be any of the names fxbuild reads"
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }));
        env.merge_env_file(env_file)?;
        Ok(env)
    }

    /// Build a snapshot from explicit pairs (tests, embedding).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Merge pairs from a dotenv file without overriding existing keys.
    pub fn merge_env_file(&mut self, path: &Path) -> crate::Result<()> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "no env file");
                return Ok(());
            }
            Err(e) => {
                return Err(crate::Error::EnvFile {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut loaded = 0usize;
        for item in iter {
            let (key, value) = item.map_err(|e| crate::Error::EnvFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            if !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                loaded += 1;
            }
        }
        tracing::debug!(path = %path.display(), loaded, "env file merged");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// True when the variable exists and is non-empty.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Owned copy of a variable, if present.
    pub fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_owned)
    }
}
