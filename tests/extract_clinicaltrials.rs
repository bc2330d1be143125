use chrono::NaiveDate;
use onco_ingest::ingest::extract::{
    clinicaltrials::extract_study,
    dates::{parse_date_parts, parse_date_value},
};
use serde_json::json;

#[test]
fn maps_a_full_v2_study() {
    let raw = json!({
        "protocolSection": {
            "identificationModule": {
                "nctId": "NCT01234567",
                "briefTitle": "Pembrolizumab in NSCLC",
                "officialTitle": "A Phase 3 Study of Pembrolizumab"
            },
            "descriptionModule": { "briefSummary": "Randomised trial." },
            "statusModule": {
                "overallStatus": "COMPLETED",
                "recruitmentStatus": "Completed",
                "startDateStruct": { "date": { "year": 2019, "month": 1, "day": 31 } },
                "completionDateStruct": { "date": "2023-06-30" }
            },
            "designModule": {
                "phases": ["PHASE2", "PHASE3"],
                "studyType": "INTERVENTIONAL",
                "enrollmentInfo": { "count": 420 }
            },
            "sponsorCollaboratorsModule": {
                "leadSponsor": { "name": "Merck Sharp & Dohme LLC" },
                "collaborators": [{ "name": "NCI" }, "Academic Group"]
            },
            "conditionsModule": { "conditions": ["Non-small Cell Lung Cancer"] },
            "armsInterventionsModule": {
                "interventions": [{ "type": "DRUG", "name": "Pembrolizumab" }]
            },
            "eligibilityModule": { "eligibilityCriteria": "Adults only" },
            "resultsModule": { "resultsFirstPostedDate": { "year": 2024, "month": 2, "day": 1 } }
        }
    });

    let study = extract_study(&raw);

    assert_eq!(study.nct_id, "NCT01234567");
    assert_eq!(study.brief_title.as_deref(), Some("Pembrolizumab in NSCLC"));
    assert_eq!(
        study.official_title.as_deref(),
        Some("A Phase 3 Study of Pembrolizumab")
    );
    assert_eq!(study.brief_summary.as_deref(), Some("Randomised trial."));
    assert_eq!(study.phase, "PHASE2, PHASE3");
    assert_eq!(study.study_type.as_deref(), Some("INTERVENTIONAL"));
    assert_eq!(study.overall_status.as_deref(), Some("COMPLETED"));
    assert_eq!(study.recruitment_status.as_deref(), Some("Completed"));
    assert_eq!(study.sponsor, "Merck Sharp & Dohme LLC");
    assert_eq!(study.collaborators, vec!["NCI", "Academic Group"]);
    assert_eq!(study.conditions, vec!["Non-small Cell Lung Cancer"]);
    assert_eq!(study.interventions, vec!["Pembrolizumab"]);
    assert_eq!(study.eligibility_criteria.as_deref(), Some("Adults only"));
    assert_eq!(study.start_date, NaiveDate::from_ymd_opt(2019, 1, 31));
    assert_eq!(study.completion_date, NaiveDate::from_ymd_opt(2023, 6, 30));
    assert_eq!(study.enrollment, Some(420));
    assert!(study.has_results);
    assert_eq!(study.results_first_posted, NaiveDate::from_ymd_opt(2024, 2, 1));
}

#[test]
fn single_phase_wins_over_phase_list() {
    let raw = json!({
        "protocolSection": {
            "identificationModule": { "nctId": "NCT1" },
            "designModule": { "phase": "PHASE1", "phases": ["PHASE2"] }
        }
    });
    assert_eq!(extract_study(&raw).phase, "PHASE1");
}

#[test]
fn top_level_phase_and_results_flag_are_fallbacks() {
    let raw = json!({
        "protocolSection": { "identificationModule": { "nctId": "NCT2" } },
        "phase": ["EARLY_PHASE1"],
        "hasResults": true
    });
    let study = extract_study(&raw);
    assert_eq!(study.phase, "EARLY_PHASE1");
    assert!(study.has_results);
    assert_eq!(study.results_first_posted, None);
}

#[test]
fn missing_everything_yields_empty_study() {
    let study = extract_study(&json!({}));
    assert_eq!(study.nct_id, "");
    assert_eq!(study.phase, "");
    assert_eq!(study.sponsor, "");
    assert!(study.conditions.is_empty());
    assert!(!study.has_results);
    assert_eq!(study.start_date, None);
}

#[test]
fn malformed_modules_do_not_poison_the_rest() {
    let raw = json!({
        "protocolSection": {
            "identificationModule": { "nctId": "NCT3", "briefTitle": 12 },
            "designModule": "not an object",
            "conditionsModule": { "conditions": "Lymphoma" },
            "statusModule": { "startDateStruct": { "date": { "year": 2020, "month": 2 } } },
            "sponsorCollaboratorsModule": { "collaborators": [null, 5, { "name": " " }] }
        }
    });
    let study = extract_study(&raw);
    assert_eq!(study.nct_id, "NCT3");
    assert_eq!(study.brief_title, None);
    assert_eq!(study.phase, "");
    assert!(study.conditions.is_empty());
    assert!(study.collaborators.is_empty());
    assert_eq!(study.start_date, None);
}

#[test]
fn date_parts_are_one_based_and_complete() {
    assert_eq!(
        parse_date_parts(Some(2020), Some(1), Some(31)),
        NaiveDate::from_ymd_opt(2020, 1, 31)
    );
    assert_eq!(
        parse_date_parts(Some(2020), Some(12), Some(1)),
        NaiveDate::from_ymd_opt(2020, 12, 1)
    );
    assert_eq!(parse_date_parts(Some(2020), Some(0), Some(1)), None);
    assert_eq!(parse_date_parts(Some(2020), Some(1), None), None);
    assert_eq!(parse_date_parts(Some(2021), Some(2), Some(29)), None);
}

#[test]
fn date_values_accept_numeric_strings() {
    let value = json!({ "year": "2022", "month": "7", "day": "4" });
    assert_eq!(parse_date_value(&value), NaiveDate::from_ymd_opt(2022, 7, 4));
    assert_eq!(parse_date_value(&json!(20220704)), None);
}
