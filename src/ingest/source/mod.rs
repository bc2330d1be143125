//! Source adapters: query construction, paced term loop, extraction and upsert.

pub mod clinicaltrials;
pub mod fda;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

pub use clinicaltrials::ClinicalTrialsAdapter;
pub use fda::FdaAdapter;

use super::upsert::UpsertOutcome;
use crate::{
    config::IngestConfig,
    error::{IngestError, StoreError},
    model::{ScrapingResult, SourceTag, TermReport},
    store::Store,
};

/// One external registry.
///
/// Implementations record per-term failures in `result` themselves; an
/// `Err` means the run as a whole broke and marks it failed.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceTag;

    async fn scrape(&self, store: &dyn Store, result: &mut ScrapingResult)
        -> Result<(), IngestError>;
}

/// The per-source pieces plugged into [`scrape_terms`].
#[async_trait]
pub(crate) trait TermSource: SourceAdapter {
    fn terms(&self) -> &[String];

    fn config(&self) -> &IngestConfig;

    /// One page of raw items for a term.
    async fn fetch(&self, term: &str) -> Result<Vec<Value>, IngestError>;

    async fn process(&self, store: &dyn Store, item: &Value) -> Result<UpsertOutcome, StoreError>;
}

/// Walk the terms strictly in order.
///
/// A failing term (fetch exhausted its retries, an upsert hit a store error,
/// or the store could not flush the term's writes) counts once in
/// `items_failed` and the loop moves on. Overlapping terms are not
/// de-duplicated; the natural-key upsert converges repeats.
pub(crate) async fn scrape_terms<S>(source: &S, store: &dyn Store, result: &mut ScrapingResult)
where
    S: TermSource + ?Sized,
{
    let tag = source.source();
    let gate = source.config().gate;
    let retry = source.config().retry;

    for term in source.terms() {
        let mut report = TermReport {
            term: term.clone(),
            ..TermReport::default()
        };

        let written = (result.items_added, result.items_updated, result.items_processed);
        let outcome = match retry.run(|| source.fetch(term)).await {
            Ok(items) => {
                report.fetched = items.len();
                process_items(source, store, &items, &mut report, result).await
            }
            Err(err) => {
                gate.pause().await;
                Err(err)
            }
        };
        let flushed = store.flush().await;
        if flushed.is_err() {
            // the store dropped this term's buffered writes
            (result.items_added, result.items_updated, result.items_processed) = written;
            report.processed = 0;
        }
        let outcome = match (outcome, flushed) {
            (Ok(()), Err(err)) => Err(IngestError::from(err)),
            (Err(err), Err(flush_err)) => {
                error!(source = %tag, %term, err = %flush_err, "flush failed");
                Err(err)
            }
            (outcome, Ok(())) => outcome,
        };

        match outcome {
            Ok(()) => info!(
                source = %tag,
                %term,
                fetched = report.fetched,
                processed = report.processed,
                skipped = report.skipped,
                "term complete"
            ),
            Err(err) => {
                error!(source = %tag, %term, %err, "term failed");
                report.error = Some(err.to_string());
                result.items_failed += 1;
            }
        }
        result.terms.push(report);
    }
}

async fn process_items<S>(
    source: &S,
    store: &dyn Store,
    items: &[Value],
    report: &mut TermReport,
    result: &mut ScrapingResult,
) -> Result<(), IngestError>
where
    S: TermSource + ?Sized,
{
    for item in items {
        let outcome = source.process(store, item).await;
        source.config().gate.pause().await;
        match outcome? {
            UpsertOutcome::Created => {
                result.items_added += 1;
                result.items_processed += 1;
                report.processed += 1;
            }
            UpsertOutcome::Updated => {
                result.items_updated += 1;
                result.items_processed += 1;
                report.processed += 1;
            }
            UpsertOutcome::Skipped => {
                result.items_skipped += 1;
                report.skipped += 1;
            }
        }
    }
    Ok(())
}

/// Items under `key`, or none when the payload lacks the array.
pub(crate) fn items_at(payload: &Value, key: &str) -> Vec<Value> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn owned_terms(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}
