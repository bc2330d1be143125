//! CLI entry-point for a one-off scrape.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, ingest::ScraperService, model::SourceTag};

/// Args for the `scrape` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Restrict to these sources (default: all).
    #[arg(long = "source", value_enum, value_delimiter = ',')]
    pub sources: Vec<SourceTag>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let store = super::open_store(&settings).await?;
    let service = ScraperService::from_settings(&settings, store)?;

    let results = if args.sources.is_empty() {
        service.run_all().await
    } else {
        service.run_selected(&args.sources).await
    };

    info!(sources = results.len(), "scrape finished");
    let rendered = serde_json::to_string_pretty(&results).context("render summaries")?;
    println!("{rendered}");
    Ok(())
}
