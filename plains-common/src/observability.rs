//! `tracing` bootstrap shared by the `plains` binary and its tests.
//!
//! Events go to a daily rolling file (non-blocking writer) and, optionally,
//! to stderr as well. [`init_logging`] installs the global subscriber once;
//! later calls return the path chosen by the first.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "PLAINS_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Names the default directory and the file prefix.
    pub app_name: &'static str,
    /// Explicit directory. `None` consults `PLAINS_LOG_DIR`, then
    /// `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "plains",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Where the rolling appender writes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    prefix: String,
}

impl LogTarget {
    fn resolve(config: &LogConfig) -> Self {
        let dir = match (&config.log_dir, std::env::var(LOG_DIR_ENV)) {
            (Some(dir), _) => expand_home(dir),
            (None, Ok(env_dir)) if !env_dir.is_empty() => expand_home(Path::new(&env_dir)),
            _ => default_data_dir(config.app_name),
        };
        Self {
            dir,
            prefix: format!("{}.log", config.app_name),
        }
    }

    /// File the daily appender uses on `date`.
    fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.prefix, date.format("%Y-%m-%d")))
    }
}

fn sink<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

/// Install the global subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let target = LogTarget::resolve(&config);
    std::fs::create_dir_all(&target.dir)
        .with_context(|| format!("creating log directory {}", target.dir.display()))?;
    let path = target.file_for(Local::now().date_naive());

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&target.dir, &target.prefix));
    let _ = LOG_GUARD.set(guard);

    let mut layers = vec![sink(config.format, writer, false)];
    if config.emit_stderr {
        layers.push(sink(config.format, std::io::stderr, true));
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::debug!(log_path = %path.display(), format = ?config.format, "logging.initialised");
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

fn expand_home(path: &Path) -> PathBuf {
    let home_relative = path.to_str().and_then(|s| s.strip_prefix("~/"));
    match (home_relative, std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local/share").join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = LogConfig {
            log_dir: Some(PathBuf::from("/var/log/plains")),
            ..LogConfig::default()
        };
        let target = LogTarget::resolve(&config);
        assert_eq!(target.dir, PathBuf::from("/var/log/plains"));
        assert_eq!(target.prefix, "plains.log");
    }

    #[test]
    fn daily_file_name_carries_the_date() {
        let target = LogTarget {
            dir: PathBuf::from("/tmp/logs"),
            prefix: "plains.log".into(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            target.file_for(date),
            PathBuf::from("/tmp/logs/plains.log.2026-03-07")
        );
    }

    #[test]
    fn absolute_paths_are_not_expanded() {
        assert_eq!(expand_home(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn log_format_parses_lowercase() {
        let fmt: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(fmt, LogFormat::Json);
        assert!(serde_json::from_str::<LogFormat>("\"Json\"").is_err());
    }
}
