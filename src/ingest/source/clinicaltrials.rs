//! ClinicalTrials.gov v2 adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use super::{items_at, owned_terms, scrape_terms, SourceAdapter, TermSource};
use crate::{
    config::IngestConfig,
    error::{IngestError, StoreError},
    ingest::{
        extract::clinicaltrials::extract_study,
        registry::RegistryClient,
        upsert::{upsert_study, UpsertOutcome},
    },
    model::{ScrapingResult, SourceTag},
    store::Store,
};

/// Condition keywords passed as `query.cond`.
pub const CONDITION_KEYWORDS: &[&str] = &[
    "cancer",
    "tumor",
    "oncology",
    "malignant",
    "carcinoma",
    "sarcoma",
    "leukemia",
    "lymphoma",
];

const STUDIES_PATH: &str = "v2/studies";

const STUDY_FIELDS: &str = "NCTId,BriefTitle,OfficialTitle,BriefSummary,OverallStatus,Phase,\
StudyType,LeadSponsorName,CollaboratorName,Condition,InterventionName,EligibilityCriteria,\
StartDate,CompletionDate,EnrollmentCount,HasResults,ResultsFirstPostDate";

pub struct ClinicalTrialsAdapter {
    client: Arc<dyn RegistryClient>,
    config: IngestConfig,
    conditions: Vec<String>,
}

impl ClinicalTrialsAdapter {
    pub fn new(client: Arc<dyn RegistryClient>, config: IngestConfig) -> Self {
        Self {
            client,
            config,
            conditions: owned_terms(CONDITION_KEYWORDS),
        }
    }

    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl TermSource for ClinicalTrialsAdapter {
    fn terms(&self) -> &[String] {
        &self.conditions
    }

    fn config(&self) -> &IngestConfig {
        &self.config
    }

    async fn fetch(&self, condition: &str) -> Result<Vec<Value>, IngestError> {
        let query = [
            ("query.cond", condition.to_string()),
            ("pageSize", self.config.page_size.to_string()),
            ("format", "json".to_string()),
            ("fields", STUDY_FIELDS.to_string()),
        ];
        let payload = self.client.get_json(STUDIES_PATH, &query).await?;
        Ok(items_at(&payload, "studies"))
    }

    async fn process(&self, store: &dyn Store, item: &Value) -> Result<UpsertOutcome, StoreError> {
        upsert_study(store, extract_study(item)).await
    }
}

#[async_trait]
impl SourceAdapter for ClinicalTrialsAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::ClinicalTrials
    }

    #[instrument(skip_all, fields(source = "clinicaltrials"))]
    async fn scrape(
        &self,
        store: &dyn Store,
        result: &mut ScrapingResult,
    ) -> Result<(), IngestError> {
        info!(conditions = self.conditions.len(), "starting clinical-trial scrape");
        scrape_terms(self, store, result).await;
        info!(processed = result.items_processed, "clinical-trial scrape finished");
        Ok(())
    }
}
