use onco_ingest::{ingest::classify::classify, model::DrugCategory};
use proptest::prelude::*;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn checkpoint_language_is_immunotherapy() {
    let category = classify(
        "Programmed death receptor-1 (PD-1) blocking antibody",
        &owned(&["Melanoma"]),
        "",
    );
    assert_eq!(category, DrugCategory::Immunotherapy);
}

#[test]
fn pd_l1_beats_chemotherapy_in_indications() {
    let category = classify(
        "",
        &owned(&["In combination with platinum chemotherapy for PD-L1 positive NSCLC"]),
        "",
    );
    assert_eq!(category, DrugCategory::Immunotherapy);
}

#[test]
fn kinase_inhibitor_is_targeted_even_with_chemo_mention() {
    let category = classify(
        "Kinase Inhibitor",
        &owned(&["after failure of prior chemotherapy"]),
        "",
    );
    assert_eq!(category, DrugCategory::Targeted);
}

#[test]
fn monoclonal_antibody_is_targeted() {
    assert_eq!(
        classify("HER2-directed monoclonal antibody", &[], ""),
        DrugCategory::Targeted
    );
}

#[test]
fn antineoplastic_class_falls_back_to_chemotherapy() {
    assert_eq!(
        classify("alkylating agent", &[], "Antineoplastic Agents"),
        DrugCategory::Chemotherapy
    );
}

#[test]
fn chemotherapy_word_in_mechanism() {
    assert_eq!(
        classify("cytotoxic chemotherapy", &[], ""),
        DrugCategory::Chemotherapy
    );
}

#[test]
fn no_cue_is_other() {
    assert_eq!(
        classify("", &owned(&["Nausea and vomiting"]), "Antiemetic"),
        DrugCategory::Other
    );
}

proptest! {
    #[test]
    fn immunotherapy_cue_always_wins(
        before in "[a-zA-Z ,.]{0,40}",
        after in "[a-zA-Z ,.]{0,40}",
        cue in prop::sample::select(vec!["PD-L1", "pd-1", "Checkpoint Inhibitor"]),
        class in "[a-zA-Z ]{0,20}",
    ) {
        let indication = format!("{before} {cue} with chemotherapy {after}");
        let category = classify("kinase inhibitor", &[indication], &class);
        prop_assert_eq!(category, DrugCategory::Immunotherapy);
    }

    #[test]
    fn classification_ignores_case(text in "[a-zA-Z -]{0,60}") {
        let lower = classify(&text.to_lowercase(), &[], "");
        let upper = classify(&text.to_uppercase(), &[], "");
        prop_assert_eq!(lower, upper);
    }
}
