// PicLingo command line
// Detects objects in a video stream and labels each one in two languages

mod app;
mod args;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use piclingo_core::languages;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Overrides `--log-level` when set
const LOG_ENV: &str = "PICLINGO_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            args::report_parse_error(&err)?;
            return Ok(());
        }
    };

    init_logging(&cli.log_level);

    if cli.list_languages {
        println!("{}", languages::table_listing());
        return Ok(());
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            args::print_help()?;
            return Ok(());
        }
    };

    let stats = app::run(config).await?;
    info!(
        "Processed {} frames ({} detections, {} translation calls)",
        stats.frames, stats.detections, stats.translation_calls
    );
    Ok(())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
