//! In-process store used for dry runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::Mutex;

use super::{Store, StoreResult};
use crate::{
    error::StoreError,
    model::{CanonicalDrug, CanonicalStudy, NewScrapingRun, RecordId, ScrapingRun, Stored},
};

/// The three collections plus the id sequence, shared with [`super::JsonStore`].
#[derive(Debug, Default)]
pub(crate) struct Collections {
    pub drugs: Vec<Stored<CanonicalDrug>>,
    pub studies: IndexMap<String, Stored<CanonicalStudy>>,
    pub runs: Vec<ScrapingRun>,
    pub next_id: RecordId,
}

impl Collections {
    pub fn restore(
        drugs: Vec<Stored<CanonicalDrug>>,
        studies: Vec<Stored<CanonicalStudy>>,
        runs: Vec<ScrapingRun>,
    ) -> Self {
        let max_id = drugs
            .iter()
            .map(|d| d.id)
            .chain(studies.iter().map(|s| s.id))
            .chain(runs.iter().map(|r| r.id))
            .max()
            .unwrap_or(0);
        Self {
            drugs,
            studies: studies
                .into_iter()
                .map(|s| (s.record.nct_id.clone(), s))
                .collect(),
            runs,
            next_id: max_id,
        }
    }

    pub fn allocate(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    pub fn find_drug(
        &self,
        generic_name: &str,
        brand_name: Option<&str>,
    ) -> Option<Stored<CanonicalDrug>> {
        self.drugs
            .iter()
            .find(|d| d.record.matches(generic_name, brand_name))
            .cloned()
    }

    pub fn create_drug(&mut self, drug: CanonicalDrug) -> RecordId {
        let id = self.allocate();
        let now = Utc::now();
        self.drugs.push(Stored {
            id,
            created_at: now,
            updated_at: now,
            record: drug,
        });
        id
    }

    pub fn update_drug(&mut self, id: RecordId, drug: CanonicalDrug) -> StoreResult<()> {
        let slot = self
            .drugs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::NotFound(id))?;
        slot.record = drug;
        slot.updated_at = Utc::now();
        Ok(())
    }

    pub fn create_study(&mut self, study: CanonicalStudy) -> RecordId {
        let id = self.allocate();
        let now = Utc::now();
        self.studies.insert(
            study.nct_id.clone(),
            Stored {
                id,
                created_at: now,
                updated_at: now,
                record: study,
            },
        );
        id
    }

    pub fn update_study(&mut self, id: RecordId, study: CanonicalStudy) -> StoreResult<()> {
        let slot = self
            .studies
            .values_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        slot.record = study;
        slot.updated_at = Utc::now();
        Ok(())
    }

    pub fn append_run(&mut self, run: NewScrapingRun) -> ScrapingRun {
        let id = self.allocate();
        let run = run.into_run(id);
        self.runs.push(run.clone());
        run
    }

    pub fn recent_runs(&self, limit: usize) -> Vec<ScrapingRun> {
        self.runs.iter().rev().take(limit).cloned().collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_drug(
        &self,
        generic_name: &str,
        brand_name: Option<&str>,
    ) -> StoreResult<Option<Stored<CanonicalDrug>>> {
        Ok(self.inner.lock().await.find_drug(generic_name, brand_name))
    }

    async fn create_drug(&self, drug: CanonicalDrug) -> StoreResult<RecordId> {
        Ok(self.inner.lock().await.create_drug(drug))
    }

    async fn update_drug(&self, id: RecordId, drug: CanonicalDrug) -> StoreResult<()> {
        self.inner.lock().await.update_drug(id, drug)
    }

    async fn find_study(&self, nct_id: &str) -> StoreResult<Option<Stored<CanonicalStudy>>> {
        Ok(self.inner.lock().await.studies.get(nct_id).cloned())
    }

    async fn create_study(&self, study: CanonicalStudy) -> StoreResult<RecordId> {
        Ok(self.inner.lock().await.create_study(study))
    }

    async fn update_study(&self, id: RecordId, study: CanonicalStudy) -> StoreResult<()> {
        self.inner.lock().await.update_study(id, study)
    }

    async fn append_run(&self, run: NewScrapingRun) -> StoreResult<ScrapingRun> {
        Ok(self.inner.lock().await.append_run(run))
    }

    async fn recent_runs(&self, limit: usize) -> StoreResult<Vec<ScrapingRun>> {
        Ok(self.inner.lock().await.recent_runs(limit))
    }

    async fn drugs(&self) -> StoreResult<Vec<Stored<CanonicalDrug>>> {
        Ok(self.inner.lock().await.drugs.clone())
    }

    async fn studies(&self) -> StoreResult<Vec<Stored<CanonicalStudy>>> {
        Ok(self.inner.lock().await.studies.values().cloned().collect())
    }
}
