//! openFDA drug-label payloads.

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, OneOrMany};

use super::{dates::parse_calendar_date, first_present, head, non_blank, DrugExtract};
use crate::ingest::classify::classify;

/// The `openfda` harmonised block of a label.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenFda {
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub generic_name: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub brand_name: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub pharm_class_moa: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub drug_class: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub mechanism_of_action: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub manufacturer_name: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub molecular_formula: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub atc_code: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub approval_date: Vec<String>,
}

/// One item of the `results` array of `/drug/label.json`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FdaLabel {
    #[serde_as(as = "DefaultOnError")]
    pub openfda: OpenFda,
    #[serde(rename = "substanceName")]
    #[serde_as(as = "DefaultOnError")]
    pub substance_name: Option<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub active_ingredient: Vec<String>,
    #[serde(rename = "proprietaryName")]
    #[serde_as(as = "DefaultOnError")]
    pub proprietary_name: Option<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub indications_and_usage: Vec<String>,
    #[serde_as(as = "DefaultOnError")]
    pub drug_class: Option<String>,
    #[serde(rename = "mechanismOfAction")]
    #[serde_as(as = "DefaultOnError")]
    pub mechanism_of_action: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub company: Option<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub description: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub purpose: Vec<String>,
}

impl FdaLabel {
    /// Never fails: anything that is not an object parses as an empty label.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    pub fn generic_name(&self) -> String {
        first_present([
            head(&self.openfda.generic_name),
            self.substance_name.as_deref(),
            head(&self.active_ingredient),
        ])
        .unwrap_or_default()
        .to_string()
    }

    pub fn brand_name(&self) -> Option<String> {
        first_present([
            head(&self.openfda.brand_name),
            self.proprietary_name.as_deref(),
        ])
        .map(str::to_string)
    }

    pub fn indications(&self) -> Vec<String> {
        self.indications_and_usage
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn drug_class(&self) -> String {
        first_present([
            head(&self.openfda.pharm_class_moa),
            self.drug_class.as_deref(),
        ])
        .unwrap_or_default()
        .to_string()
    }

    pub fn mechanism(&self) -> String {
        first_present([
            head(&self.openfda.mechanism_of_action),
            self.mechanism_of_action.as_deref(),
        ])
        .unwrap_or_default()
        .to_string()
    }

    pub fn company(&self) -> String {
        first_present([
            head(&self.openfda.manufacturer_name),
            self.company.as_deref(),
        ])
        .unwrap_or_default()
        .to_string()
    }

    pub fn description(&self) -> String {
        first_present([head(&self.description), head(&self.purpose)])
            .unwrap_or_default()
            .to_string()
    }

    pub fn molecular_formula(&self) -> String {
        non_blank(head(&self.openfda.molecular_formula)).unwrap_or_default()
    }

    pub fn atc_code(&self) -> String {
        non_blank(head(&self.openfda.atc_code)).unwrap_or_default()
    }

    pub fn approval_date(&self) -> Option<chrono::NaiveDate> {
        head(&self.openfda.approval_date).and_then(parse_calendar_date)
    }

    /// All mechanism statements joined, for classification.
    fn mechanism_text(&self) -> String {
        if self.openfda.mechanism_of_action.is_empty() {
            self.mechanism()
        } else {
            self.openfda.mechanism_of_action.join(" ")
        }
    }

    fn drug_class_text(&self) -> String {
        let mut parts = vec![self.drug_class()];
        parts.extend(self.openfda.drug_class.iter().cloned());
        parts.join(" ")
    }

    pub fn to_extract(&self) -> DrugExtract {
        let indications = self.indications();
        let category = classify(&self.mechanism_text(), &indications, &self.drug_class_text());
        DrugExtract {
            generic_name: self.generic_name(),
            brand_name: self.brand_name(),
            drug_class: self.drug_class(),
            category,
            mechanism: self.mechanism(),
            company: self.company(),
            description: self.description(),
            molecular_formula: self.molecular_formula(),
            atc_code: self.atc_code(),
            indications,
            approval_date: self.approval_date(),
        }
    }
}

/// Parse and extract in one step.
pub fn extract_drug(raw: &Value) -> DrugExtract {
    FdaLabel::from_value(raw).to_extract()
}
