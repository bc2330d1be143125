//! Runs the configured adapters and keeps the run log.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::{future::join_all, FutureExt};
use tokio::time::Instant;
use tracing::{error, info, instrument};

use super::{
    registry::HttpRegistry,
    source::{ClinicalTrialsAdapter, FdaAdapter, SourceAdapter},
};
use crate::{
    config::Settings,
    error::IngestError,
    model::{NewScrapingRun, ScrapingResult, SourceTag},
    store::Store,
};

/// Explicitly constructed ingestion service: a store plus the adapters to drive.
pub struct ScraperService {
    store: Arc<dyn Store>,
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl ScraperService {
    pub fn new(store: Arc<dyn Store>, adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { store, adapters }
    }

    /// Wire both registries over HTTP from configuration.
    pub fn from_settings(settings: &Settings, store: Arc<dyn Store>) -> Result<Self, IngestError> {
        let user_agent = settings.user_agent();
        let config = settings.ingest();

        let fda = HttpRegistry::new(&settings.fda_api_base, &user_agent, settings.http_timeout)?
            .with_api_key(settings.fda_api_key.clone());
        let trials = HttpRegistry::new(
            &settings.clinicaltrials_api_base,
            &user_agent,
            settings.http_timeout,
        )?;

        let adapters: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(FdaAdapter::new(Arc::new(fda), config.clone())),
            Box::new(ClinicalTrialsAdapter::new(Arc::new(trials), config)),
        ];
        Ok(Self::new(store, adapters))
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn sources(&self) -> Vec<SourceTag> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    /// Run every adapter concurrently and wait for all of them.
    ///
    /// Never fails: each adapter is isolated, and one that errors or panics
    /// still yields a `failed` summary and a run-log row.
    #[instrument(skip(self))]
    pub async fn run_all(&self) -> Vec<ScrapingResult> {
        info!(adapters = self.adapters.len(), "starting all scraping jobs");
        let results = join_all(self.adapters.iter().map(|a| self.run_source(a.as_ref()))).await;
        info!("all scraping jobs completed");
        results
    }

    /// Like [`Self::run_all`], restricted to the given sources.
    pub async fn run_selected(&self, sources: &[SourceTag]) -> Vec<ScrapingResult> {
        let selected = self
            .adapters
            .iter()
            .filter(|a| sources.contains(&a.source()))
            .map(|a| self.run_source(a.as_ref()));
        join_all(selected).await
    }

    /// Run one adapter to completion and append its run-log row.
    pub async fn run_source(&self, adapter: &dyn SourceAdapter) -> ScrapingResult {
        let source = adapter.source();
        let started = Instant::now();
        let mut result = ScrapingResult::new(source);

        let outcome = AssertUnwindSafe(adapter.scrape(self.store.as_ref(), &mut result))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(%source, %err, "scraping failed");
                result.error = Some(err.to_string());
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(%source, %message, "scraping task panicked");
                result.error = Some(format!("adapter panicked: {message}"));
            }
        }

        // writes left buffered by an adapter that bailed out mid-term
        if let Err(err) = self.store.flush().await {
            error!(%source, %err, "could not flush store");
            result.error.get_or_insert_with(|| err.to_string());
        }

        result.set_duration(started.elapsed());
        result.settle();

        if let Err(err) = self.store.append_run(NewScrapingRun::from_result(&result)).await {
            error!(%source, %err, "could not record scraping run");
        }
        info!(
            %source,
            status = ?result.status,
            processed = result.items_processed,
            added = result.items_added,
            updated = result.items_updated,
            failed = result.items_failed,
            skipped = result.items_skipped,
            duration_ms = result.duration_ms,
            "scraping completed"
        );
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
