//! CLI entry-point for recurring scrapes.

use std::time::Duration;

use anyhow::Result;
use clap::Args as ClapArgs;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, instrument, warn};

use crate::{config::Settings, ingest::ScraperService, model::RunStatus};

/// Args for the `schedule` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Hours between runs (defaults to SCRAPE_INTERVAL_HOURS).
    #[arg(long)]
    pub interval_hours: Option<u64>,
    /// Run once immediately instead of waiting a full interval first.
    #[arg(long, default_value_t = false)]
    pub run_now: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let period = args
        .interval_hours
        .map(|h| Duration::from_secs(h.max(1).saturating_mul(3600)))
        .unwrap_or(settings.scrape_interval);
    let store = super::open_store(&settings).await?;
    let service = ScraperService::from_settings(&settings, store)?;

    let first = if args.run_now {
        Instant::now()
    } else {
        Instant::now() + period
    };
    let mut ticker = interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), run_now = args.run_now, "scheduler started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let results = service.run_all().await;
                let failed = results
                    .iter()
                    .filter(|r| r.status == RunStatus::Failed)
                    .count();
                if failed > 0 {
                    warn!(failed, total = results.len(), "scheduled scrape had failed sources");
                } else {
                    info!(total = results.len(), "scheduled scrape done");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, stopping scheduler");
                break;
            }
        }
    }
    Ok(())
}
