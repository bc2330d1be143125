//! Lookup-or-create against the canonical store.

use tracing::{debug, warn};

use super::extract::DrugExtract;
use crate::{
    error::StoreError,
    model::{Agency, CanonicalStudy},
    store::Store,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// The natural key was missing; nothing was written.
    Skipped,
}

/// Merge one drug sighting from `agency` into the store.
///
/// Extracted fields overwrite the stored ones. `approvals` only grows, and
/// an agency's approval date is filled once and then kept.
pub async fn upsert_drug(
    store: &dyn Store,
    incoming: DrugExtract,
    agency: Agency,
) -> Result<UpsertOutcome, StoreError> {
    if incoming.generic_name.is_empty() {
        warn!(%agency, brand = ?incoming.brand_name, "skipping drug without generic name");
        return Ok(UpsertOutcome::Skipped);
    }

    let existing = store
        .find_drug(&incoming.generic_name, incoming.brand_name.as_deref())
        .await?;

    match existing {
        Some(stored) => {
            let approval_date = incoming.approval_date;
            let mut drug = incoming.overwrite(stored.record);
            drug.approvals.insert(agency);
            if let Some(date) = approval_date {
                drug.approval_dates.entry(agency).or_insert(date);
            }
            debug!(id = stored.id, generic = %drug.generic_name, "updating drug");
            store.update_drug(stored.id, drug).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let drug = incoming.into_new_drug(agency);
            let id = store.create_drug(drug).await?;
            debug!(id, "created drug");
            Ok(UpsertOutcome::Created)
        }
    }
}

/// Write one study sighting. Existing records are overwritten wholesale.
pub async fn upsert_study(
    store: &dyn Store,
    incoming: CanonicalStudy,
) -> Result<UpsertOutcome, StoreError> {
    if incoming.nct_id.is_empty() {
        warn!(title = ?incoming.brief_title, "skipping study without NCT id");
        return Ok(UpsertOutcome::Skipped);
    }

    match store.find_study(&incoming.nct_id).await? {
        Some(stored) => {
            debug!(id = stored.id, nct_id = %incoming.nct_id, "updating study");
            store.update_study(stored.id, incoming).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let nct_id = incoming.nct_id.clone();
            let id = store.create_study(incoming).await?;
            debug!(id, %nct_id, "created study");
            Ok(UpsertOutcome::Created)
        }
    }
}
