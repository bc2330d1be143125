#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    io,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use onco_ingest::{
    config::IngestConfig,
    error::{IngestError, StoreError},
    ingest::{pacing::DelayGate, registry::RegistryClient, retry::RetryPolicy},
    model::{CanonicalDrug, CanonicalStudy, NewScrapingRun, RecordId, ScrapingRun, Stored},
    store::{MemoryStore, Store, StoreResult},
};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Registry double keyed by search term; unknown terms return an empty payload.
#[derive(Default)]
pub struct CannedRegistry {
    payloads: HashMap<String, Value>,
    statuses: HashMap<String, StatusCode>,
    calls: AtomicUsize,
    terms_seen: Mutex<Vec<String>>,
}

impl CannedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, term: &str, payload: Value) -> Self {
        self.payloads.insert(term.to_string(), payload);
        self
    }

    /// Every request for `term` answers 503.
    pub fn failing(self, term: &str) -> Self {
        self.responding(term, StatusCode::SERVICE_UNAVAILABLE)
    }

    pub fn responding(mut self, term: &str, status: StatusCode) -> Self {
        self.statuses.insert(term.to_string(), status);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn terms_seen(&self) -> Vec<String> {
        self.terms_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for CannedRegistry {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = query
            .iter()
            .find(|(k, _)| *k == "search" || *k == "query.cond")
            .map(|(_, v)| v.as_str())
            .unwrap_or_default();
        let term = raw
            .trim_start_matches("indications_and_usage:")
            .trim_matches('"')
            .to_string();
        self.terms_seen.lock().unwrap().push(term.clone());

        if let Some(&status) = self.statuses.get(&term) {
            return Err(IngestError::Status {
                url: format!("canned://{path}?term={term}"),
                status,
            });
        }
        Ok(self.payloads.get(&term).cloned().unwrap_or_else(|| json!({})))
    }
}

/// [`MemoryStore`] that refuses to create the named drugs and studies.
#[derive(Default)]
pub struct RejectingStore {
    inner: MemoryStore,
    drugs: HashSet<String>,
    studies: HashSet<String>,
}

impl RejectingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_drug(mut self, generic_name: &str) -> Self {
        self.drugs.insert(generic_name.to_string());
        self
    }

    pub fn rejecting_study(mut self, nct_id: &str) -> Self {
        self.studies.insert(nct_id.to_string());
        self
    }
}

fn disk_full() -> StoreError {
    StoreError::Io {
        path: PathBuf::from("/canned/store"),
        source: io::Error::new(io::ErrorKind::Other, "disk full"),
    }
}

#[async_trait]
impl Store for RejectingStore {
    async fn find_drug(
        &self,
        generic_name: &str,
        brand_name: Option<&str>,
    ) -> StoreResult<Option<Stored<CanonicalDrug>>> {
        self.inner.find_drug(generic_name, brand_name).await
    }

    async fn create_drug(&self, drug: CanonicalDrug) -> StoreResult<RecordId> {
        if self.drugs.contains(&drug.generic_name) {
            return Err(disk_full());
        }
        self.inner.create_drug(drug).await
    }

    async fn update_drug(&self, id: RecordId, drug: CanonicalDrug) -> StoreResult<()> {
        self.inner.update_drug(id, drug).await
    }

    async fn find_study(&self, nct_id: &str) -> StoreResult<Option<Stored<CanonicalStudy>>> {
        self.inner.find_study(nct_id).await
    }

    async fn create_study(&self, study: CanonicalStudy) -> StoreResult<RecordId> {
        if self.studies.contains(&study.nct_id) {
            return Err(disk_full());
        }
        self.inner.create_study(study).await
    }

    async fn update_study(&self, id: RecordId, study: CanonicalStudy) -> StoreResult<()> {
        self.inner.update_study(id, study).await
    }

    async fn append_run(&self, run: NewScrapingRun) -> StoreResult<ScrapingRun> {
        self.inner.append_run(run).await
    }

    async fn recent_runs(&self, limit: usize) -> StoreResult<Vec<ScrapingRun>> {
        self.inner.recent_runs(limit).await
    }

    async fn drugs(&self) -> StoreResult<Vec<Stored<CanonicalDrug>>> {
        self.inner.drugs().await
    }

    async fn studies(&self) -> StoreResult<Vec<Stored<CanonicalStudy>>> {
        self.inner.studies().await
    }
}

/// No pacing, no backoff: keeps tests fast without paused time.
pub fn instant_config() -> IngestConfig {
    IngestConfig {
        retry: RetryPolicy::new(3, Duration::ZERO),
        gate: DelayGate::new(Duration::ZERO),
        page_size: 100,
    }
}

pub fn fda_label(generic: &str, brand: &str) -> Value {
    json!({
        "openfda": {
            "generic_name": [generic],
            "brand_name": [brand],
            "manufacturer_name": ["Acme Oncology"],
            "mechanism_of_action": ["Kinase inhibitor of BCR-ABL."],
        },
        "indications_and_usage": ["Treatment of chronic myeloid leukemia."],
    })
}

pub fn label_without_generic_name(brand: &str) -> Value {
    json!({
        "openfda": { "brand_name": [brand] },
        "indications_and_usage": ["Treatment of solid tumors."],
    })
}

pub fn study(nct_id: &str, title: &str) -> Value {
    json!({
        "protocolSection": {
            "identificationModule": { "nctId": nct_id, "briefTitle": title },
            "statusModule": {
                "overallStatus": "RECRUITING",
                "startDateStruct": { "date": { "year": 2021, "month": 3, "day": 15 } }
            },
            "designModule": { "phases": ["PHASE2"], "studyType": "INTERVENTIONAL" },
            "conditionsModule": { "conditions": ["Lung Cancer"] }
        }
    })
}

pub fn study_without_id(title: &str) -> Value {
    json!({
        "protocolSection": {
            "identificationModule": { "briefTitle": title }
        }
    })
}
