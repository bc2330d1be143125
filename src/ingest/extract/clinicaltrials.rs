//! ClinicalTrials.gov v2 study payloads.

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, OneOrMany};

use super::{dates::parse_date_value, first_present, non_blank};
use crate::model::CanonicalStudy;

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyPayload {
    #[serde_as(as = "DefaultOnError")]
    pub protocol_section: ProtocolSection,
    #[serde_as(as = "DefaultOnError")]
    pub has_results: Option<bool>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub phase: Vec<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolSection {
    #[serde_as(as = "DefaultOnError")]
    pub identification_module: IdentificationModule,
    #[serde_as(as = "DefaultOnError")]
    pub description_module: DescriptionModule,
    #[serde_as(as = "DefaultOnError")]
    pub design_module: DesignModule,
    #[serde_as(as = "DefaultOnError")]
    pub status_module: StatusModule,
    #[serde_as(as = "DefaultOnError")]
    pub sponsor_collaborators_module: SponsorCollaboratorsModule,
    #[serde_as(as = "DefaultOnError")]
    pub conditions_module: ConditionsModule,
    #[serde_as(as = "DefaultOnError")]
    pub arms_interventions_module: InterventionsModule,
    #[serde_as(as = "DefaultOnError")]
    pub eligibility_module: EligibilityModule,
    /// Kept raw: only its presence and one date matter.
    pub results_module: Option<Value>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentificationModule {
    #[serde_as(as = "DefaultOnError")]
    pub nct_id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub brief_title: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub official_title: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescriptionModule {
    #[serde_as(as = "DefaultOnError")]
    pub brief_summary: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignModule {
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub phase: Vec<String>,
    #[serde_as(as = "DefaultOnError<OneOrMany<_>>")]
    pub phases: Vec<String>,
    #[serde_as(as = "DefaultOnError")]
    pub study_type: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub enrollment_info: EnrollmentInfo,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrollmentInfo {
    #[serde_as(as = "DefaultOnError")]
    pub count: Option<u32>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusModule {
    #[serde_as(as = "DefaultOnError")]
    pub overall_status: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub recruitment_status: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub start_date_struct: DateStruct,
    #[serde_as(as = "DefaultOnError")]
    pub completion_date_struct: DateStruct,
    #[serde_as(as = "DefaultOnError")]
    pub results_first_post_date_struct: DateStruct,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DateStruct {
    pub date: Option<Value>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SponsorCollaboratorsModule {
    #[serde_as(as = "DefaultOnError")]
    pub lead_sponsor: LeadSponsor,
    #[serde_as(as = "DefaultOnError")]
    pub collaborators: Vec<Value>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeadSponsor {
    #[serde_as(as = "DefaultOnError")]
    pub name: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConditionsModule {
    #[serde_as(as = "DefaultOnError")]
    pub conditions: Vec<Value>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterventionsModule {
    #[serde_as(as = "DefaultOnError")]
    pub interventions: Vec<Value>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EligibilityModule {
    #[serde_as(as = "DefaultOnError")]
    pub eligibility_criteria: Option<String>,
}

impl StudyPayload {
    /// Never fails: anything that is not an object parses as an empty study.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    fn protocol(&self) -> &ProtocolSection {
        &self.protocol_section
    }

    /// Registry identifier; empty when absent.
    pub fn nct_id(&self) -> String {
        non_blank(self.protocol().identification_module.nct_id.as_deref()).unwrap_or_default()
    }

    /// Single phase, or the phase list joined, or the top-level phase.
    pub fn phase(&self) -> String {
        let design = &self.protocol().design_module;
        [&design.phase, &design.phases, &self.phase]
            .into_iter()
            .map(|list| joined(list))
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }

    pub fn sponsor(&self) -> String {
        non_blank(
            self.protocol()
                .sponsor_collaborators_module
                .lead_sponsor
                .name
                .as_deref(),
        )
        .unwrap_or_default()
    }

    pub fn collaborators(&self) -> Vec<String> {
        names(&self.protocol().sponsor_collaborators_module.collaborators)
    }

    pub fn conditions(&self) -> Vec<String> {
        names(&self.protocol().conditions_module.conditions)
    }

    pub fn interventions(&self) -> Vec<String> {
        names(&self.protocol().arms_interventions_module.interventions)
    }

    pub fn has_results(&self) -> bool {
        self.has_results.unwrap_or_else(|| {
            self.protocol()
                .results_module
                .as_ref()
                .is_some_and(|m| !m.is_null())
        })
    }

    pub fn results_first_posted(&self) -> Option<chrono::NaiveDate> {
        let from_results = self
            .protocol()
            .results_module
            .as_ref()
            .and_then(|m| m.get("resultsFirstPostedDate"))
            .and_then(parse_date_value);
        from_results.or_else(|| {
            self.protocol()
                .status_module
                .results_first_post_date_struct
                .date
                .as_ref()
                .and_then(parse_date_value)
        })
    }

    pub fn to_study(&self) -> CanonicalStudy {
        let protocol = self.protocol();
        let ident = &protocol.identification_module;
        let status = &protocol.status_module;
        CanonicalStudy {
            nct_id: self.nct_id(),
            brief_title: non_blank(ident.brief_title.as_deref()),
            official_title: non_blank(ident.official_title.as_deref()),
            brief_summary: non_blank(protocol.description_module.brief_summary.as_deref()),
            phase: self.phase(),
            study_type: non_blank(protocol.design_module.study_type.as_deref()),
            overall_status: non_blank(status.overall_status.as_deref()),
            recruitment_status: non_blank(status.recruitment_status.as_deref()),
            sponsor: self.sponsor(),
            collaborators: self.collaborators(),
            conditions: self.conditions(),
            interventions: self.interventions(),
            eligibility_criteria: non_blank(
                protocol.eligibility_module.eligibility_criteria.as_deref(),
            ),
            start_date: status.start_date_struct.date.as_ref().and_then(parse_date_value),
            completion_date: status
                .completion_date_struct
                .date
                .as_ref()
                .and_then(parse_date_value),
            enrollment: protocol.design_module.enrollment_info.count,
            has_results: self.has_results(),
            results_first_posted: self.results_first_posted(),
        }
    }
}

/// Parse and extract in one step.
pub fn extract_study(raw: &Value) -> CanonicalStudy {
    StudyPayload::from_value(raw).to_study()
}

fn joined(list: &[String]) -> String {
    list.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// List entries come either as plain strings or as `{ "name": .. }` objects.
fn names(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            first_present([
                entry.as_str(),
                entry.get("name").and_then(Value::as_str),
            ])
        })
        .map(str::to_string)
        .collect()
}
