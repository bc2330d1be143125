//! Typed parse step and field extractors, one submodule per source.
//!
//! Every source payload is first deserialised into a tolerant struct whose
//! fields are all optional; a field of the wrong shape becomes its default
//! instead of an error. Extractors then walk fixed fallback chains over that
//! struct and never fail: absence yields `""`, an empty list or `None`.

pub mod clinicaltrials;
pub mod dates;
pub mod fda;

use chrono::NaiveDate;

use crate::model::{Agency, CanonicalDrug, DrugCategory};

/// Fields pulled from one drug-label record, before merging with the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrugExtract {
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
    pub approval_date: Option<NaiveDate>,
}

impl DrugExtract {
    /// First sighting: the record carries only this agency's approval.
    pub fn into_new_drug(self, agency: Agency) -> CanonicalDrug {
        let approval_date = self.approval_date;
        let mut drug = self.overwrite(CanonicalDrug::default());
        drug.approvals.insert(agency);
        if let Some(date) = approval_date {
            drug.approval_dates.insert(agency, date);
        }
        drug
    }

    /// Replace every extracted field of `existing`, leaving approvals and
    /// approval dates for the caller to merge.
    pub fn overwrite(self, existing: CanonicalDrug) -> CanonicalDrug {
        CanonicalDrug {
            generic_name: self.generic_name,
            brand_name: self.brand_name,
            drug_class: self.drug_class,
            category: self.category,
            mechanism: self.mechanism,
            company: self.company,
            description: self.description,
            molecular_formula: self.molecular_formula,
            atc_code: self.atc_code,
            indications: self.indications,
            approvals: existing.approvals,
            approval_dates: existing.approval_dates,
        }
    }
}

/// First candidate that is present and not blank, trimmed.
pub(crate) fn first_present<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

pub(crate) fn head(list: &[String]) -> Option<&str> {
    list.first().map(String::as_str)
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    first_present([value]).map(str::to_string)
}
