//! Canonical records kept by the store.

pub mod drug;
pub mod run;
pub mod study;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use drug::{Agency, CanonicalDrug, DrugCategory};
pub use run::{NewScrapingRun, RunStatus, ScrapingResult, ScrapingRun, SourceTag, TermReport};
pub use study::CanonicalStudy;

/// Store-assigned identifier.
pub type RecordId = u64;

/// A canonical record together with the bookkeeping the store attaches to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record: T,
}
