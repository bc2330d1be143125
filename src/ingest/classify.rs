//! Keyword rules deriving a therapeutic category.

use crate::model::DrugCategory;

const IMMUNOTHERAPY_CUES: &[&str] = &["checkpoint inhibitor", "pd-1", "pd-l1"];
const TARGETED_CUES: &[&str] = &["kinase inhibitor", "monoclonal antibody"];
const CHEMOTHERAPY_CUE: &str = "chemotherapy";
const ANTINEOPLASTIC_CLASS: &str = "antineoplastic";

/// Classify from mechanism text, indications and drug class.
///
/// Rules run in a fixed order and the first hit wins, so immunotherapy cues
/// beat targeted-therapy cues, which beat chemotherapy cues.
pub fn classify(mechanism: &str, indications: &[String], drug_class: &str) -> DrugCategory {
    let mut text = mechanism.to_lowercase();
    for indication in indications {
        text.push(' ');
        text.push_str(&indication.to_lowercase());
    }

    if contains_any(&text, IMMUNOTHERAPY_CUES) {
        DrugCategory::Immunotherapy
    } else if contains_any(&text, TARGETED_CUES) {
        DrugCategory::Targeted
    } else if text.contains(CHEMOTHERAPY_CUE)
        || drug_class.to_lowercase().contains(ANTINEOPLASTIC_CLASS)
    {
        DrugCategory::Chemotherapy
    } else {
        DrugCategory::Other
    }
}

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}
