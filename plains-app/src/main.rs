use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use plains_common::observability::init_logging;
use plains_runtime::PlainsRuntime;
use std::time::Duration;

mod cli;
mod launch;
mod print;

fn main() -> Result<()> {
    let args = Cli::parse();

    // 1) Config: file, then env, then flags
    let cfg = launch::load_config(&args)?;

    // 2) Logging from the resolved config
    let log_path = init_logging(launch::log_config(&cfg.logging, args.print))
        .context("initialising logging")?;

    // 3) Runtime, then the session itself
    let runtime = PlainsRuntime::build("plains-worker", None)?;
    tracing::info!(
        log = %log_path.display(),
        endpoint = %cfg.feed.endpoint,
        print = args.print,
        "plains.start"
    );
    let result = runtime.block_on(launch::run(args, cfg, runtime.handle()));
    runtime.shutdown(Duration::from_millis(250));
    result
}
