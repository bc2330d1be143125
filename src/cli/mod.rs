//! Command-line interface wiring for onco-ingest.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{
    config::Settings,
    store::{JsonStore, Store},
};

pub mod runs;
pub mod schedule;
pub mod scrape;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Oncology registry ingestion", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Scrape(args) => scrape::run(args, settings).await,
            Commands::Schedule(args) => schedule::run(args, settings).await,
            Commands::Runs(args) => runs::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pull every configured registry once.
    Scrape(scrape::Args),
    /// Keep pulling on a fixed cadence until interrupted.
    Schedule(schedule::Args),
    /// Show the most recent run-log rows.
    Runs(runs::Args),
}

pub(crate) async fn open_store(settings: &Settings) -> Result<Arc<dyn Store>> {
    let store = JsonStore::open(&settings.data_dir)
        .await
        .with_context(|| format!("open store at {}", settings.data_dir.display()))?;
    Ok(Arc::new(store))
}
