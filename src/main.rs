use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use stadtfeed::{
    config::Config,
    extractor::ReadabilityReader,
    fetcher::HttpFetcher,
    pipeline::{Pipeline, PipelineSettings},
    telemetry,
    tracking::JsonFileRepository,
};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let selectors = config.load_selectors()?;
    let fetcher = HttpFetcher::new(config.fetch()).context("Failed to build HTTP client")?;

    info!(
        listing = %config.listing_url(),
        feed = %config.feed_path().display(),
        tracking = %config.tracking_path().display(),
        "Starting scrape"
    );

    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        Arc::new(ReadabilityReader),
        Arc::new(JsonFileRepository::new(config.tracking_path())),
        selectors,
        PipelineSettings::from_config(&config),
    );
    let summary = pipeline.run().await?;

    if summary.written {
        info!(
            new = summary.new,
            updated = summary.updated,
            unchanged = summary.unchanged,
            total = summary.total,
            "Feed updated"
        );
    } else {
        info!("No articles found, outputs left unchanged");
    }
    Ok(())
}
