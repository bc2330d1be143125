use std::collections::BTreeSet;

use chrono::NaiveDate;
use onco_ingest::{
    ingest::{
        extract::DrugExtract,
        upsert::{upsert_drug, upsert_study, UpsertOutcome},
    },
    model::{Agency, CanonicalStudy},
    store::{MemoryStore, Store},
};
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

fn extract(generic: &str, brand: Option<&str>) -> DrugExtract {
    DrugExtract {
        generic_name: generic.to_string(),
        brand_name: brand.map(str::to_string),
        company: "Acme".to_string(),
        ..DrugExtract::default()
    }
}

fn dated(generic: &str, date: Option<NaiveDate>) -> DrugExtract {
    DrugExtract {
        approval_date: date,
        ..extract(generic, None)
    }
}

#[tokio::test]
async fn first_sighting_creates_with_one_approval() {
    let store = MemoryStore::new();
    let date = NaiveDate::from_ymd_opt(2015, 3, 1);

    let outcome = upsert_drug(&store, dated("nivolumab", date), Agency::Fda)
        .await
        .unwrap();

    assert_eq!(outcome, UpsertOutcome::Created);
    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs.len(), 1);
    let drug = &drugs[0].record;
    assert_eq!(drug.approvals, BTreeSet::from([Agency::Fda]));
    assert_eq!(drug.approval_dates.get(&Agency::Fda).copied(), date);
}

#[tokio::test]
async fn lookup_is_case_insensitive_and_overwrites_fields() {
    let store = MemoryStore::new();
    upsert_drug(&store, extract("Imatinib", None), Agency::Fda)
        .await
        .unwrap();

    let mut newer = extract("IMATINIB", Some("Gleevec"));
    newer.company = "Novartis".to_string();
    let outcome = upsert_drug(&store, newer, Agency::Fda).await.unwrap();

    assert_eq!(outcome, UpsertOutcome::Updated);
    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs.len(), 1);
    assert_eq!(drugs[0].record.generic_name, "IMATINIB");
    assert_eq!(drugs[0].record.company, "Novartis");
    assert_eq!(drugs[0].record.brand_name.as_deref(), Some("Gleevec"));
}

#[tokio::test]
async fn case_folding_covers_non_ascii_names() {
    let store = MemoryStore::new();
    upsert_drug(&store, extract("Témozolomide", Some("Témodal")), Agency::Fda)
        .await
        .unwrap();

    let by_generic = upsert_drug(
        &store,
        extract("TÉMOZOLOMIDE", Some("Témodal")),
        Agency::Nmpa,
    )
    .await
    .unwrap();
    let by_brand = upsert_drug(&store, extract("temozolomid", Some("TÉMODAL")), Agency::Fda)
        .await
        .unwrap();

    assert_eq!(by_generic, UpsertOutcome::Updated);
    assert_eq!(by_brand, UpsertOutcome::Updated);
    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs.len(), 1);
    assert_eq!(
        drugs[0].record.approvals,
        BTreeSet::from([Agency::Fda, Agency::Nmpa])
    );
}

#[tokio::test]
async fn brand_name_matches_when_generic_differs() {
    let store = MemoryStore::new();
    upsert_drug(&store, extract("pembrolizumab", Some("Keytruda")), Agency::Fda)
        .await
        .unwrap();

    let outcome = upsert_drug(
        &store,
        extract("pembrolizumab injection", Some("KEYTRUDA")),
        Agency::Nmpa,
    )
    .await
    .unwrap();

    assert_eq!(outcome, UpsertOutcome::Updated);
    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs.len(), 1);
    assert_eq!(
        drugs[0].record.approvals,
        BTreeSet::from([Agency::Fda, Agency::Nmpa])
    );
}

#[tokio::test]
async fn existing_approval_date_is_never_replaced() {
    let store = MemoryStore::new();
    let first = NaiveDate::from_ymd_opt(2014, 9, 4);
    let later = NaiveDate::from_ymd_opt(2020, 1, 1);

    upsert_drug(&store, dated("pembrolizumab", first), Agency::Fda)
        .await
        .unwrap();
    upsert_drug(&store, dated("pembrolizumab", later), Agency::Fda)
        .await
        .unwrap();
    upsert_drug(&store, dated("pembrolizumab", None), Agency::Fda)
        .await
        .unwrap();

    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs[0].record.approval_dates.get(&Agency::Fda).copied(), first);
}

#[tokio::test]
async fn missing_date_is_filled_on_a_later_sighting() {
    let store = MemoryStore::new();
    let date = NaiveDate::from_ymd_opt(2018, 6, 12);

    upsert_drug(&store, dated("durvalumab", None), Agency::Fda)
        .await
        .unwrap();
    upsert_drug(&store, dated("durvalumab", date), Agency::Fda)
        .await
        .unwrap();

    let drugs = store.drugs().await.unwrap();
    assert_eq!(drugs[0].record.approval_dates.get(&Agency::Fda).copied(), date);
}

#[tokio::test]
async fn study_is_overwritten_wholesale() {
    let store = MemoryStore::new();
    let first = CanonicalStudy {
        nct_id: "NCT00000001".to_string(),
        brief_title: Some("Old title".to_string()),
        sponsor: "Sponsor A".to_string(),
        enrollment: Some(10),
        ..CanonicalStudy::default()
    };
    let second = CanonicalStudy {
        nct_id: "NCT00000001".to_string(),
        brief_title: Some("New title".to_string()),
        ..CanonicalStudy::default()
    };

    assert_eq!(
        upsert_study(&store, first).await.unwrap(),
        UpsertOutcome::Created
    );
    assert_eq!(
        upsert_study(&store, second.clone()).await.unwrap(),
        UpsertOutcome::Updated
    );

    let studies = store.studies().await.unwrap();
    assert_eq!(studies.len(), 1);
    assert_eq!(studies[0].record, second);
}

proptest! {
    #[test]
    fn drug_without_generic_name_is_a_no_op(
        brand in proptest::option::of("[A-Za-z]{1,12}"),
        company in "[A-Za-z ]{0,20}",
    ) {
        let rt = runtime();
        let store = MemoryStore::new();
        let mut incoming = extract("", brand.as_deref());
        incoming.company = company;

        let outcome = rt.block_on(upsert_drug(&store, incoming, Agency::Fda)).unwrap();

        prop_assert_eq!(outcome, UpsertOutcome::Skipped);
        prop_assert!(rt.block_on(store.drugs()).unwrap().is_empty());
    }

    #[test]
    fn approvals_union_regardless_of_order(
        generic in "[a-z]{3,12}",
        nmpa_first in any::<bool>(),
    ) {
        let rt = runtime();
        let store = MemoryStore::new();
        let order = if nmpa_first {
            [Agency::Nmpa, Agency::Fda]
        } else {
            [Agency::Fda, Agency::Nmpa]
        };
        for agency in order {
            rt.block_on(upsert_drug(&store, extract(&generic, None), agency)).unwrap();
        }

        let drugs = rt.block_on(store.drugs()).unwrap();
        prop_assert_eq!(drugs.len(), 1);
        prop_assert_eq!(
            drugs[0].record.approvals.clone(),
            BTreeSet::from([Agency::Fda, Agency::Nmpa])
        );
    }

    #[test]
    fn study_without_id_changes_nothing(title in proptest::option::of("[A-Za-z ]{0,30}")) {
        let rt = runtime();
        let store = MemoryStore::new();
        let existing = CanonicalStudy {
            nct_id: "NCT09999999".to_string(),
            ..CanonicalStudy::default()
        };
        rt.block_on(upsert_study(&store, existing)).unwrap();
        let before = rt.block_on(store.studies()).unwrap();

        let incoming = CanonicalStudy {
            brief_title: title,
            ..CanonicalStudy::default()
        };
        let outcome = rt.block_on(upsert_study(&store, incoming)).unwrap();

        prop_assert_eq!(outcome, UpsertOutcome::Skipped);
        prop_assert_eq!(rt.block_on(store.studies()).unwrap(), before);
    }
}
