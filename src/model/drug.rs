//! Canonical drug record.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Regulatory agency whose approval a drug carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agency {
    Fda,
    Nmpa,
}

impl Agency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fda => "fda",
            Self::Nmpa => "nmpa",
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Therapeutic category derived from mechanism and indication text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrugCategory {
    Immunotherapy,
    Targeted,
    Chemotherapy,
    #[default]
    Other,
}

/// Normalised drug, keyed case-insensitively by generic name (brand name as fallback).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalDrug {
    pub generic_name: String,
    pub brand_name: Option<String>,
    pub drug_class: String,
    pub category: DrugCategory,
    pub mechanism: String,
    pub company: String,
    pub description: String,
    pub molecular_formula: String,
    pub atc_code: String,
    pub indications: Vec<String>,
    /// Grows through merges, never shrinks.
    pub approvals: BTreeSet<Agency>,
    /// First approval date per agency. Once set, never overwritten.
    pub approval_dates: BTreeMap<Agency, NaiveDate>,
}

impl CanonicalDrug {
    /// Natural-key match: generic name, or brand name when one is given.
    /// Case is folded with full Unicode lowercasing.
    pub fn matches(&self, generic_name: &str, brand_name: Option<&str>) -> bool {
        if same_name(&self.generic_name, generic_name) {
            return true;
        }
        match (brand_name, self.brand_name.as_deref()) {
            (Some(wanted), Some(own)) if !wanted.is_empty() => same_name(own, wanted),
            _ => false,
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
