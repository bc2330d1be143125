//! Storage boundary for canonical records and the run log.
//!
//! The upsert engine only needs lookups by natural key plus create and
//! update by id; the run log is append-only. Nothing guards the
//! lookup-then-write sequence, so two writers racing on one natural key
//! can both create.

mod json;
mod memory;

use async_trait::async_trait;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::{
    error::StoreError,
    model::{CanonicalDrug, CanonicalStudy, NewScrapingRun, RecordId, ScrapingRun, Stored},
};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Case-insensitive match on generic name, or on brand name when given.
    async fn find_drug(
        &self,
        generic_name: &str,
        brand_name: Option<&str>,
    ) -> StoreResult<Option<Stored<CanonicalDrug>>>;

    async fn create_drug(&self, drug: CanonicalDrug) -> StoreResult<RecordId>;

    async fn update_drug(&self, id: RecordId, drug: CanonicalDrug) -> StoreResult<()>;

    /// Exact match on the registry identifier.
    async fn find_study(&self, nct_id: &str) -> StoreResult<Option<Stored<CanonicalStudy>>>;

    async fn create_study(&self, study: CanonicalStudy) -> StoreResult<RecordId>;

    async fn update_study(&self, id: RecordId, study: CanonicalStudy) -> StoreResult<()>;

    /// Make buffered record mutations durable. On error the buffered
    /// changes are discarded and lookups see the last durable state.
    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn append_run(&self, run: NewScrapingRun) -> StoreResult<ScrapingRun>;

    /// Most recent run-log rows, newest first.
    async fn recent_runs(&self, limit: usize) -> StoreResult<Vec<ScrapingRun>>;

    async fn drugs(&self) -> StoreResult<Vec<Stored<CanonicalDrug>>>;

    async fn studies(&self) -> StoreResult<Vec<Stored<CanonicalStudy>>>;
}
