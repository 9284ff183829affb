use crate::cli::Cli;
use crate::print;
use anyhow::{Context, Result};
use plains_common::LogConfig;
use plains_config::{LoggingSettings, PlainsConfig, PlainsConfigLoader};
use plains_feed::{FeedApi, FeedSource};
use plains_runtime::PlainsHandle;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "plains.yaml";

pub fn load_config(args: &Cli) -> Result<PlainsConfig> {
    let loader = match &args.config {
        Some(path) => PlainsConfigLoader::new().with_file(path),
        None => PlainsConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load().context("loading configuration")?;
    if let Some(endpoint) = &args.endpoint {
        cfg.feed.endpoint = endpoint.clone();
    }
    Ok(cfg)
}

/// The terminal UI owns the screen, so stderr logging is only honoured
/// in print mode.
pub fn log_config(settings: &LoggingSettings, print_mode: bool) -> LogConfig {
    LogConfig {
        log_dir: settings.dir.clone(),
        emit_stderr: settings.stderr && print_mode,
        format: settings.format,
        default_filter: settings.filter.clone(),
        ..LogConfig::default()
    }
}

pub async fn run(args: Cli, cfg: PlainsConfig, handle: PlainsHandle) -> Result<()> {
    let api = FeedApi::new(&cfg.feed.endpoint)
        .with_context(|| format!("feed endpoint `{}`", cfg.feed.endpoint))?
        .with_timeout(cfg.feed.timeout())
        .with_retries(cfg.feed.retries);
    let initial = args.initial_filter();

    if args.print {
        let cancel = handle.child_token();
        let on_interrupt = cancel.clone();
        handle.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        return print::run(&api, &initial, args.json, &cancel).await;
    }

    let source: Arc<dyn FeedSource> = Arc::new(api);
    plains_tui::run(source, initial, handle.child_token()).await
}
