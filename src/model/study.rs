//! Canonical clinical-study record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalised study, keyed by its registry identifier (NCT number).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalStudy {
    pub nct_id: String,
    pub brief_title: Option<String>,
    pub official_title: Option<String>,
    pub brief_summary: Option<String>,
    pub phase: String,
    pub study_type: Option<String>,
    pub overall_status: Option<String>,
    pub recruitment_status: Option<String>,
    pub sponsor: String,
    pub collaborators: Vec<String>,
    pub conditions: Vec<String>,
    pub interventions: Vec<String>,
    pub eligibility_criteria: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub enrollment: Option<u32>,
    pub has_results: bool,
    pub results_first_posted: Option<NaiveDate>,
}
