//! Per-source run summaries and the append-only run log.

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// External registry an adapter pulls from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Fda,
    #[value(name = "clinicaltrials")]
    ClinicalTrials,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fda => "fda",
            Self::ClinicalTrials => "clinicaltrials",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Partial,
    Failed,
}

/// Outcome of one search term within an adapter run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TermReport {
    pub term: String,
    pub fetched: usize,
    pub processed: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary returned for one adapter invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingResult {
    pub source: SourceTag,
    pub status: RunStatus,
    pub items_processed: u64,
    pub items_added: u64,
    pub items_updated: u64,
    /// Failed terms, not failed items: one per term whose fetch or upsert broke.
    pub items_failed: u64,
    /// Items dropped for lacking their natural key.
    pub items_skipped: u64,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub terms: Vec<TermReport>,
}

impl ScrapingResult {
    pub fn new(source: SourceTag) -> Self {
        Self {
            source,
            status: RunStatus::Success,
            items_processed: 0,
            items_added: 0,
            items_updated: 0,
            items_failed: 0,
            items_skipped: 0,
            duration_ms: 0,
            error: None,
            terms: Vec::new(),
        }
    }

    pub fn set_duration(&mut self, elapsed: Duration) {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    /// Derive the final status from the counters and any escaped error.
    pub fn settle(&mut self) {
        self.status = if self.error.is_some() {
            RunStatus::Failed
        } else if self.items_failed == 0 {
            RunStatus::Success
        } else if self.terms.iter().any(|t| t.error.is_none()) {
            RunStatus::Partial
        } else {
            RunStatus::Failed
        };
    }
}

/// One append-only row of the run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingRun {
    pub id: RecordId,
    pub source: SourceTag,
    pub status: RunStatus,
    pub items_processed: u64,
    pub items_added: u64,
    pub items_updated: u64,
    pub items_failed: u64,
    pub items_skipped: u64,
    pub duration_ms: u64,
    pub error_message: Option<String>,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// A run-log row before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScrapingRun {
    pub result: ScrapingResult,
    pub recorded_at: DateTime<Utc>,
}

impl NewScrapingRun {
    pub fn from_result(result: &ScrapingResult) -> Self {
        Self {
            result: result.clone(),
            recorded_at: Utc::now(),
        }
    }

    pub fn into_run(self, id: RecordId) -> ScrapingRun {
        let details = serde_json::to_value(&self.result).unwrap_or(serde_json::Value::Null);
        let result = self.result;
        ScrapingRun {
            id,
            source: result.source,
            status: result.status,
            items_processed: result.items_processed,
            items_added: result.items_added,
            items_updated: result.items_updated,
            items_failed: result.items_failed,
            items_skipped: result.items_skipped,
            duration_ms: result.duration_ms,
            error_message: result.error,
            details,
            recorded_at: self.recorded_at,
        }
    }
}
