//! Layered settings for the `plains` binary.
//!
//! Sources merge in the order they are registered; `PLAINS__`-prefixed
//! environment variables are applied last (`PLAINS__FEED__ENDPOINT` sets
//! `feed.endpoint`). After merging, `${VAR}` references inside string values
//! are expanded from the process environment. Every field has a default, so
//! no source at all is a valid configuration.
use config::{Config, ConfigError, Environment, File, FileFormat};
use plains_common::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Nested references are followed at most this many times.
const EXPANSION_PASSES: usize = 8;

/// Content collection the feed is read from.
pub const DEFAULT_ENDPOINT: &str = "https://api.greatplainsag.com/v1/agronomy/en";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlainsConfig {
    pub feed: FeedSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Retry budget for 429/5xx and transport failures. The feed is fetched
    /// once per session, so this stays at zero unless an operator opts in.
    pub retries: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 15,
            retries: 0,
        }
    }
}

impl FeedSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
    /// Mirror events to stderr. Ignored while the terminal UI is running.
    pub stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::default(),
            filter: "info".to_string(),
            stderr: false,
        }
    }
}

impl PlainsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.endpoint.trim().is_empty() {
            return Err(ConfigError::Message("feed.endpoint must not be empty".into()));
        }
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::Message("feed.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Expand `$VAR` / `${VAR}` until the text stops changing. Unknown variables
/// and reference cycles leave the remaining text untouched.
fn expand_vars(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..EXPANSION_PASSES {
        let Ok(next) = shellexpand::env(&current) else {
            break;
        };
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current
}

fn expand_strings(value: &mut Value) {
    match value {
        Value::String(s) if s.contains('$') => *s = expand_vars(s),
        Value::Array(items) => items.iter_mut().for_each(expand_strings),
        Value::Object(fields) => fields.values_mut().for_each(expand_strings),
        _ => {}
    }
}

#[derive(Debug, Clone)]
enum Source {
    File { path: PathBuf, required: bool },
    Yaml(String),
}

/// Collects sources and resolves them into a [`PlainsConfig`].
#[derive(Debug, Clone, Default)]
pub struct PlainsConfigLoader {
    sources: Vec<Source>,
}

impl PlainsConfigLoader {
    /// A loader with no file sources; only defaults and `PLAINS__` variables.
    ///
    /// ```
    /// use plains_config::{PlainsConfigLoader, DEFAULT_ENDPOINT};
    ///
    /// let config = PlainsConfigLoader::new()
    ///     .with_yaml_str("feed:\n  timeout_secs: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.feed.timeout_secs, 5);
    /// assert_eq!(config.feed.endpoint, DEFAULT_ENDPOINT);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Required file; format follows the extension (YAML, TOML or JSON).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(Source::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Skipped without error when the file is absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(Source::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Inline YAML layer.
    ///
    /// ```
    /// use plains_common::LogFormat;
    /// use plains_config::PlainsConfigLoader;
    ///
    /// let cfg = PlainsConfigLoader::new()
    ///     .with_yaml_str("logging:\n  format: json\n  stderr: true\n")
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.logging.format, LogFormat::Json);
    /// assert!(cfg.logging.stderr);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.sources.push(Source::Yaml(yaml.to_string()));
        self
    }

    /// Merge, expand and validate.
    pub fn load(self) -> Result<PlainsConfig, ConfigError> {
        let mut builder = Config::builder();
        for source in self.sources {
            builder = match source {
                Source::File { path, required } => {
                    builder.add_source(File::from(path).required(required))
                }
                Source::Yaml(text) => builder.add_source(File::from_str(&text, FileFormat::Yaml)),
            };
        }
        let merged = builder
            .add_source(
                Environment::with_prefix("PLAINS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut raw: Value = merged.try_deserialize()?;
        expand_strings(&mut raw);
        let config: PlainsConfig =
            serde_json::from_value(raw).map_err(|e| ConfigError::Message(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_braced_and_bare_references() {
        temp_env::with_vars([("PLAINS_T_CITY", Some("Salina")), ("PLAINS_T_ST", Some("KS"))], || {
            assert_eq!(expand_vars("${PLAINS_T_CITY}-$PLAINS_T_ST"), "Salina-KS");
        });
    }

    #[test]
    fn walks_nested_values() {
        temp_env::with_var("PLAINS_T_HOST", Some("feeds.local"), || {
            let mut v = json!({ "a": ["http://${PLAINS_T_HOST}", 3], "b": { "c": "$PLAINS_T_HOST" }, "d": null });
            expand_strings(&mut v);
            assert_eq!(
                v,
                json!({ "a": ["http://feeds.local", 3], "b": { "c": "feeds.local" }, "d": null })
            );
        });
    }

    #[test]
    fn follows_references_inside_values() {
        temp_env::with_vars(
            [
                ("PLAINS_T_INNER", Some("agronomy")),
                ("PLAINS_T_OUTER", Some("v1/${PLAINS_T_INNER}")),
            ],
            || assert_eq!(expand_vars("/${PLAINS_T_OUTER}/en"), "/v1/agronomy/en"),
        );
    }

    #[test]
    fn cycles_terminate() {
        temp_env::with_vars([("PLAINS_T_A", Some("${PLAINS_T_B}")), ("PLAINS_T_B", Some("${PLAINS_T_A}"))], || {
            let out = expand_vars("x=${PLAINS_T_A}");
            assert!(out.starts_with("x=${PLAINS_T_"));
        });
    }

    #[test]
    fn unknown_references_stay_literal() {
        assert_eq!(expand_vars("hi-${PLAINS_T_MISSING}"), "hi-${PLAINS_T_MISSING}");
    }

    #[test]
    fn defaults_point_at_the_public_feed() {
        let cfg = PlainsConfig::default();
        assert_eq!(cfg.feed.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.feed.timeout(), Duration::from_secs(15));
        assert_eq!(cfg.feed.retries, 0);
        assert_eq!(cfg.logging.filter, "info");
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = PlainsConfigLoader::new()
            .with_yaml_str("feed:\n  timeout_secs: 0")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        let err = PlainsConfigLoader::new()
            .with_yaml_str("feed:\n  endpoint: \"  \"")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("feed.endpoint"));
    }
}
