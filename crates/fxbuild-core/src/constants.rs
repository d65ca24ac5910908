//! Compile-time constants injected into the worker bundle.
//!
//! The set of names is closed: [`CONSTANT_SCHEMA`] lists every constant
//! the worker source may reference, and [`ConstantMap::materialize`]
//! always produces exactly that key set.

use std::collections::BTreeMap;

use crate::env::BuildEnv;
use crate::identity::ReleaseIdentity;

/// Constant slot that always carries the derived release identifier.
pub const RELEASE_NAME: &str = "RELEASE_NAME";

/// Literal text substituted for an unset environment variable.
///
/// Worker code compares against the string `"undefined"` to detect an
/// unconfigured value, so this is kept as a string rather than omitted.
pub const UNDEFINED_MARKER: &str = "undefined";

/// What to substitute when an environment-backed constant is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// Emit the string literal `"undefined"`.
    UndefinedMarker,
}

/// Where a constant's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantSource {
    Environment { absent: Absence },
    ReleaseIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantSpec {
    pub name: &'static str,
    pub source: ConstantSource,
}

const fn from_env(name: &'static str) -> ConstantSpec {
    ConstantSpec {
        name,
        source: ConstantSource::Environment {
            absent: Absence::UndefinedMarker,
        },
    }
}

pub const CONSTANT_SCHEMA: &[ConstantSpec] = &[
    from_env("BRANDING_NAME"),
    from_env("BRANDING_NAME_BSKY"),
    from_env("STANDARD_DOMAIN_LIST"),
    from_env("STANDARD_BSKY_DOMAIN_LIST"),
    from_env("DIRECT_MEDIA_DOMAINS"),
    from_env("TEXT_ONLY_DOMAINS"),
    from_env("INSTANT_VIEW_DOMAINS"),
    from_env("INSTANT_VIEW_THREADS_DOMAINS"),
    from_env("GALLERY_DOMAINS"),
    from_env("NATIVE_MULTI_IMAGE_DOMAINS"),
    from_env("HOST_URL"),
    from_env("REDIRECT_URL"),
    from_env("REDIRECT_URL_BSKY"),
    from_env("EMBED_URL"),
    from_env("MOSAIC_DOMAIN_LIST"),
    from_env("MOSAIC_BSKY_DOMAIN_LIST"),
    from_env("API_HOST_LIST"),
    from_env("SENTRY_DSN"),
    from_env("GIF_TRANSCODE_DOMAIN_LIST"),
    ConstantSpec {
        name: RELEASE_NAME,
        source: ConstantSource::ReleaseIdentity,
    },
];

/// Constant name to string-literal source text (`"value"`, quotes included).
///
/// Values are wrapped verbatim, without escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantMap {
    entries: BTreeMap<String, String>,
}

impl ConstantMap {
    /// Build the map for one invocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fxbuild_core::{BuildEnv, ConstantMap, ReleaseIdentity};
    ///
    /// let env = BuildEnv::from_pairs([("HOST_URL", "https://fxtwitter.com")]);
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    /// let release = ReleaseIdentity::derive("fixtweet", "main", "abc1234", at);
    ///
    /// let map = ConstantMap::materialize(&env, &release);
    /// assert_eq!(map.get("HOST_URL"), Some("\"https://fxtwitter.com\""));
    /// assert_eq!(map.get("SENTRY_DSN"), Some("\"undefined\""));
    /// ```
    pub fn materialize(env: &BuildEnv, release: &ReleaseIdentity) -> Self {
        let mut entries = BTreeMap::new();

        for spec in CONSTANT_SCHEMA {
            if let ConstantSource::Environment { absent } = spec.source {
                let raw = match (env.get(spec.name), absent) {
                    (Some(value), _) => value,
                    (None, Absence::UndefinedMarker) => UNDEFINED_MARKER,
                };
                entries.insert(spec.name.to_owned(), literal(raw));
            }
        }

        // Release slots are applied last so no environment value survives.
        for spec in CONSTANT_SCHEMA {
            if spec.source == ConstantSource::ReleaseIdentity {
                entries.insert(spec.name.to_owned(), literal(release.as_str()));
            }
        }

        let unset = CONSTANT_SCHEMA
            .iter()
            .filter(|s| matches!(s.source, ConstantSource::Environment { .. }))
            .filter(|s| env.get(s.name).is_none())
            .count();
        tracing::debug!(constants = entries.len(), unset, "constants materialized");

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn literal(raw: &str) -> String {
    format!("\"{raw}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn release() -> ReleaseIdentity {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
        ReleaseIdentity::derive("fixtweet", "main", "abc1234", at)
    }

    #[test]
    fn schema_has_twenty_unique_names() {
        let mut names: Vec<_> = CONSTANT_SCHEMA.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn exactly_one_release_slot() {
        let slots: Vec<_> = CONSTANT_SCHEMA
            .iter()
            .filter(|s| s.source == ConstantSource::ReleaseIdentity)
            .collect();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].name, RELEASE_NAME);
    }

    #[test]
    fn empty_env_yields_undefined_for_every_key() {
        let map = ConstantMap::materialize(&BuildEnv::default(), &release());

        assert_eq!(map.len(), CONSTANT_SCHEMA.len());
        for spec in CONSTANT_SCHEMA.iter().filter(|s| s.name != RELEASE_NAME) {
            assert_eq!(map.get(spec.name), Some("\"undefined\""), "{}", spec.name);
        }
    }

    #[test]
    fn empty_value_is_wrapped_not_marked() {
        let env = BuildEnv::from_pairs([("BRANDING_NAME", "")]);
        let map = ConstantMap::materialize(&env, &release());
        assert_eq!(map.get("BRANDING_NAME"), Some("\"\""));
    }

    #[test]
    fn values_are_not_escaped() {
        let env = BuildEnv::from_pairs([("BRANDING_NAME", "Fx\"Twitter")]);
        let map = ConstantMap::materialize(&env, &release());
        assert_eq!(map.get("BRANDING_NAME"), Some("\"Fx\"Twitter\""));
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let env = BuildEnv::from_pairs([("PATH", "/usr/bin"), ("SENTRY_AUTH_TOKEN", "sntrys_x")]);
        let map = ConstantMap::materialize(&env, &release());
        assert_eq!(map.get("PATH"), None);
        assert_eq!(map.get("SENTRY_AUTH_TOKEN"), None);
        assert_eq!(map.len(), CONSTANT_SCHEMA.len());
    }

    #[test]
    fn release_slot_overrides_environment() {
        let env = BuildEnv::from_pairs([(RELEASE_NAME, "spoofed")]);
        let map = ConstantMap::materialize(&env, &release());
        assert_eq!(
            map.get(RELEASE_NAME),
            Some(format!("\"{}\"", release()).as_str())
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn schema_name() -> impl Strategy<Value = &'static str> {
            proptest::sample::select(CONSTANT_SCHEMA.iter().map(|s| s.name).collect::<Vec<_>>())
        }

        proptest! {
            #[test]
            fn key_set_is_always_the_schema(
                vars in proptest::collection::vec((schema_name(), "[ -~]{0,20}"), 0..25),
            ) {
                let env = BuildEnv::from_pairs(vars);
                let map = ConstantMap::materialize(&env, &release());
                let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
                let mut expected: Vec<_> = CONSTANT_SCHEMA.iter().map(|s| s.name).collect();
                expected.sort_unstable();
                prop_assert_eq!(keys, expected);
            }

            #[test]
            fn release_slot_always_wins(spoof in "[ -~]{0,40}") {
                let env = BuildEnv::from_pairs([(RELEASE_NAME, spoof)]);
                let map = ConstantMap::materialize(&env, &release());
                let expected = format!("\"{}\"", release());
                prop_assert_eq!(map.get(RELEASE_NAME), Some(expected.as_str()));
            }

            #[test]
            fn set_values_are_wrapped_verbatim(value in "[ -~]{0,40}") {
                let env = BuildEnv::from_pairs([("HOST_URL", value.clone())]);
                let map = ConstantMap::materialize(&env, &release());
                let expected = format!("\"{value}\"");
                prop_assert_eq!(map.get("HOST_URL"), Some(expected.as_str()));
            }
        }
    }
}
