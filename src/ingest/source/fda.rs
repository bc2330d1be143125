//! openFDA drug-label adapter.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{items_at, owned_terms, scrape_terms, SourceAdapter, TermSource};
use crate::{
    config::IngestConfig,
    error::{IngestError, StoreError},
    ingest::{
        extract::fda::extract_drug,
        registry::RegistryClient,
        upsert::{upsert_drug, UpsertOutcome},
    },
    model::{Agency, ScrapingResult, SourceTag},
    store::Store,
};

/// Oncology-relevant phrases searched in `indications_and_usage`.
pub const FDA_SEARCH_TERMS: &[&str] = &[
    "cancer",
    "tumor",
    "oncology",
    "malignant",
    "chemotherapy",
    "immunotherapy",
    "targeted",
];

const LABEL_PATH: &str = "drug/label.json";

pub struct FdaAdapter {
    client: Arc<dyn RegistryClient>,
    config: IngestConfig,
    terms: Vec<String>,
}

impl FdaAdapter {
    pub fn new(client: Arc<dyn RegistryClient>, config: IngestConfig) -> Self {
        Self {
            client,
            config,
            terms: owned_terms(FDA_SEARCH_TERMS),
        }
    }

    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = terms.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl TermSource for FdaAdapter {
    fn terms(&self) -> &[String] {
        &self.terms
    }

    fn config(&self) -> &IngestConfig {
        &self.config
    }

    async fn fetch(&self, term: &str) -> Result<Vec<Value>, IngestError> {
        let query = [
            ("search", format!("indications_and_usage:\"{term}\"")),
            ("limit", self.config.page_size.to_string()),
        ];
        // openFDA answers a search with no hits with 404 NOT_FOUND
        match self.client.get_json(LABEL_PATH, &query).await {
            Ok(payload) => Ok(items_at(&payload, "results")),
            Err(IngestError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                debug!(%term, "no matching labels");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn process(&self, store: &dyn Store, item: &Value) -> Result<UpsertOutcome, StoreError> {
        upsert_drug(store, extract_drug(item), Agency::Fda).await
    }
}

#[async_trait]
impl SourceAdapter for FdaAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::Fda
    }

    #[instrument(skip_all, fields(source = "fda"))]
    async fn scrape(
        &self,
        store: &dyn Store,
        result: &mut ScrapingResult,
    ) -> Result<(), IngestError> {
        info!(terms = self.terms.len(), "starting drug-label scrape");
        scrape_terms(self, store, result).await;
        info!(processed = result.items_processed, "drug-label scrape finished");
        Ok(())
    }
}
