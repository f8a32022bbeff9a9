//! Runtime configuration from the environment.
//!
//! Every setting is optional; unset variables fall back to the values in
//! [`AppConfig::default`].
//!
//! | Variable | Meaning |
//! |---|---|
//! | `BLOG_EFFECTS_LIST_LATENCY_MS` | post listing latency |
//! | `BLOG_EFFECTS_CREATE_LATENCY_MS` | post creation latency |
//! | `BLOG_EFFECTS_UPDATE_LATENCY_MS` | post update latency |
//! | `BLOG_EFFECTS_SEND_LATENCY_MS` | network send latency |
//! | `BLOG_EFFECTS_LOG` | `tracing` filter directives |

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::backend::LatencyProfile;

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Application configuration.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// Simulated backend latencies.
    pub latency: LatencyProfile,
    /// Log filter overriding the default one, if set.
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Loads configuration from the process environment, after reading a
    /// `.env` file if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set to something
    /// unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "value is not valid Unicode".to_string(),
            }),
        })
    }

    /// Loads configuration through `lookup`, which yields a variable's value
    /// or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unparsable values, and passes
    /// through errors from `lookup`.
    pub fn from_lookup<Lookup>(lookup: Lookup) -> Result<Self, ConfigError>
    where
        Lookup: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = LatencyProfile::default();

        let latency = LatencyProfile {
            list_posts: get_optional_millis(
                &lookup,
                "BLOG_EFFECTS_LIST_LATENCY_MS",
                defaults.list_posts,
            )?,
            create_post: get_optional_millis(
                &lookup,
                "BLOG_EFFECTS_CREATE_LATENCY_MS",
                defaults.create_post,
            )?,
            update_post: get_optional_millis(
                &lookup,
                "BLOG_EFFECTS_UPDATE_LATENCY_MS",
                defaults.update_post,
            )?,
            send: get_optional_millis(&lookup, "BLOG_EFFECTS_SEND_LATENCY_MS", defaults.send)?,
        };
        let log_filter = lookup("BLOG_EFFECTS_LOG")?.filter(|filter| !filter.trim().is_empty());

        Ok(Self {
            latency,
            log_filter,
        })
    }
}

/// Gets an optional millisecond duration with a default value.
fn get_optional_millis<Lookup>(
    lookup: &Lookup,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    Lookup: Fn(&str) -> Result<Option<String>, ConfigError>,
{
    match lookup(key)? {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|error| ConfigError::InvalidValue {
                key: key.to_string(),
                message: error.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_in(
        variables: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<Option<String>, ConfigError> {
        let variables: HashMap<String, String> = variables
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key: &str| Ok(variables.get(key).cloned())
    }

    #[rstest]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.latency, LatencyProfile::default());
    }

    #[rstest]
    fn latencies_are_read_in_milliseconds() {
        let config = AppConfig::from_lookup(lookup_in(&[
            ("BLOG_EFFECTS_LIST_LATENCY_MS", "1"),
            ("BLOG_EFFECTS_CREATE_LATENCY_MS", "2"),
            ("BLOG_EFFECTS_UPDATE_LATENCY_MS", " 3 "),
            ("BLOG_EFFECTS_SEND_LATENCY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(
            config.latency,
            LatencyProfile {
                list_posts: Duration::from_millis(1),
                create_post: Duration::from_millis(2),
                update_post: Duration::from_millis(3),
                send: Duration::ZERO,
            }
        );
    }

    #[rstest]
    #[case("fast")]
    #[case("-5")]
    #[case("")]
    fn invalid_latency_is_rejected(#[case] value: &str) {
        let error = AppConfig::from_lookup(lookup_in(&[("BLOG_EFFECTS_SEND_LATENCY_MS", value)]))
            .unwrap_err();

        assert!(matches!(
            error,
            ConfigError::InvalidValue { ref key, .. } if key == "BLOG_EFFECTS_SEND_LATENCY_MS"
        ));
    }

    #[rstest]
    #[case("debug", Some("debug"))]
    #[case("  ", None)]
    fn log_filter_ignores_blank(#[case] value: &str, #[case] expected: Option<&str>) {
        let config = AppConfig::from_lookup(lookup_in(&[("BLOG_EFFECTS_LOG", value)])).unwrap();

        assert_eq!(config.log_filter.as_deref(), expected);
    }

    #[rstest]
    fn lookup_errors_propagate() {
        let failing = |key: &str| -> Result<Option<String>, ConfigError> {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "value is not valid Unicode".to_string(),
            })
        };

        assert!(AppConfig::from_lookup(failing).is_err());
    }

    #[rstest]
    fn error_display() {
        let error = ConfigError::InvalidValue {
            key: "BLOG_EFFECTS_LIST_LATENCY_MS".to_string(),
            message: "invalid digit found in string".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Invalid value for BLOG_EFFECTS_LIST_LATENCY_MS: invalid digit found in string"
        );
    }
}
