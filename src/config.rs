//! Runtime configuration utilities for onco-ingest.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;

use crate::ingest::{pacing::DelayGate, retry::RetryPolicy};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root folder for the JSON store and run log.
    pub data_dir: PathBuf,
    /// Base URL of the openFDA API.
    pub fda_api_base: String,
    /// Optional openFDA API key; unauthenticated calls get a lower quota.
    pub fda_api_key: Option<String>,
    /// Base URL of the ClinicalTrials.gov API.
    pub clinicaltrials_api_base: String,
    /// Pause after every ingested item, per source.
    pub rate_limit: Duration,
    /// Attempt budget for each remote fetch.
    pub max_attempts: u32,
    /// Records requested per search term.
    pub page_size: u32,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Cadence of the `schedule` command.
    pub scrape_interval: Duration,
    /// Contact address advertised in the user agent.
    pub contact_email: String,
}

/// Knobs handed to each source adapter.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub retry: RetryPolicy,
    pub gate: DelayGate,
    pub page_size: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            gate: DelayGate::default(),
            page_size: 100,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let fda_api_base =
            env::var("FDA_API_BASE").unwrap_or_else(|_| "https://api.fda.gov".to_string());
        let fda_api_key = env::var("FDA_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let clinicaltrials_api_base = env::var("CLINICALTRIALS_API_BASE")
            .unwrap_or_else(|_| "https://clinicaltrials.gov/api".to_string());
        let rate_limit = Duration::from_millis(parse_var("SCRAPER_RATE_LIMIT_MS", 1000));
        let max_attempts = parse_var("SCRAPER_MAX_ATTEMPTS", 3);
        let page_size = parse_var("SCRAPER_PAGE_SIZE", 100);
        let http_timeout = Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30));
        let interval_hours: u64 = parse_var("SCRAPE_INTERVAL_HOURS", 24u64).max(1);
        let scrape_interval = Duration::from_secs(interval_hours.saturating_mul(3600));
        let contact_email =
            env::var("CONTACT_EMAIL").unwrap_or_else(|_| "research@example.com".to_string());

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;

        Ok(Self {
            data_dir,
            fda_api_base,
            fda_api_key,
            clinicaltrials_api_base,
            rate_limit,
            max_attempts,
            page_size,
            http_timeout,
            scrape_interval,
            contact_email,
        })
    }

    /// Pacing and retry knobs shared by every adapter. The retry backoff
    /// unit is the same delay used to pace items.
    pub fn ingest(&self) -> IngestConfig {
        IngestConfig {
            retry: RetryPolicy::new(self.max_attempts, self.rate_limit),
            gate: DelayGate::new(self.rate_limit),
            page_size: self.page_size,
        }
    }

    pub fn user_agent(&self) -> String {
        format!("onco-ingest/0.1 (+{})", self.contact_email)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
