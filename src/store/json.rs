//! File-backed store: JSON snapshots for the record collections and a JSONL run log.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{info, warn};

use super::{memory::Collections, Store, StoreResult};
use crate::{
    error::StoreError,
    model::{CanonicalDrug, CanonicalStudy, NewScrapingRun, RecordId, ScrapingRun, Stored},
};

const DRUGS_FILE: &str = "drugs.json";
const STUDIES_FILE: &str = "studies.json";
const RUNS_FILE: &str = "scraping_runs.jsonl";

/// Store persisted under a data directory.
///
/// Record mutations are buffered in memory and written by [`Store::flush`],
/// one snapshot per dirty collection through a temp file and a rename. A
/// collection whose snapshot fails is rolled back to its last written state,
/// so memory never runs ahead of disk. Run-log rows are appended one per
/// line and only become visible once written.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    inner: Mutex<Journal>,
}

/// Live collections plus the last state known to be on disk.
#[derive(Debug)]
struct Journal {
    live: Collections,
    saved_drugs: Vec<Stored<CanonicalDrug>>,
    saved_studies: IndexMap<String, Stored<CanonicalStudy>>,
    drugs_dirty: bool,
    studies_dirty: bool,
}

impl Journal {
    fn new(live: Collections) -> Self {
        Self {
            saved_drugs: live.drugs.clone(),
            saved_studies: live.studies.clone(),
            live,
            drugs_dirty: false,
            studies_dirty: false,
        }
    }
}

impl JsonStore {
    /// Open (or create) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;

        let drugs: Vec<Stored<CanonicalDrug>> = read_snapshot(&root.join(DRUGS_FILE)).await?;
        let studies: Vec<Stored<CanonicalStudy>> = read_snapshot(&root.join(STUDIES_FILE)).await?;
        let runs = read_runs(&root.join(RUNS_FILE)).await?;
        info!(
            path = %root.display(),
            drugs = drugs.len(),
            studies = studies.len(),
            runs = runs.len(),
            "opened json store"
        );

        Ok(Self {
            root,
            inner: Mutex::new(Journal::new(Collections::restore(drugs, studies, runs))),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn find_drug(
        &self,
        generic_name: &str,
        brand_name: Option<&str>,
    ) -> StoreResult<Option<Stored<CanonicalDrug>>> {
        Ok(self
            .inner
            .lock()
            .await
            .live
            .find_drug(generic_name, brand_name))
    }

    async fn create_drug(&self, drug: CanonicalDrug) -> StoreResult<RecordId> {
        let mut journal = self.inner.lock().await;
        let id = journal.live.create_drug(drug);
        journal.drugs_dirty = true;
        Ok(id)
    }

    async fn update_drug(&self, id: RecordId, drug: CanonicalDrug) -> StoreResult<()> {
        let mut journal = self.inner.lock().await;
        journal.live.update_drug(id, drug)?;
        journal.drugs_dirty = true;
        Ok(())
    }

    async fn find_study(&self, nct_id: &str) -> StoreResult<Option<Stored<CanonicalStudy>>> {
        Ok(self.inner.lock().await.live.studies.get(nct_id).cloned())
    }

    async fn create_study(&self, study: CanonicalStudy) -> StoreResult<RecordId> {
        let mut journal = self.inner.lock().await;
        let id = journal.live.create_study(study);
        journal.studies_dirty = true;
        Ok(id)
    }

    async fn update_study(&self, id: RecordId, study: CanonicalStudy) -> StoreResult<()> {
        let mut journal = self.inner.lock().await;
        journal.live.update_study(id, study)?;
        journal.studies_dirty = true;
        Ok(())
    }

    async fn flush(&self) -> StoreResult<()> {
        let mut journal = self.inner.lock().await;
        let mut first_err = None;

        if journal.drugs_dirty {
            let path = self.root.join(DRUGS_FILE);
            let written = write_snapshot(&path, &journal.live.drugs).await;
            match written {
                Ok(()) => journal.saved_drugs = journal.live.drugs.clone(),
                Err(err) => {
                    warn!(path = %path.display(), %err, "drug snapshot failed, rolling back");
                    journal.live.drugs = journal.saved_drugs.clone();
                    first_err = Some(err);
                }
            }
            journal.drugs_dirty = false;
        }

        if journal.studies_dirty {
            let path = self.root.join(STUDIES_FILE);
            let written = {
                let studies: Vec<&Stored<CanonicalStudy>> =
                    journal.live.studies.values().collect();
                write_snapshot(&path, &studies).await
            };
            match written {
                Ok(()) => journal.saved_studies = journal.live.studies.clone(),
                Err(err) => {
                    warn!(path = %path.display(), %err, "study snapshot failed, rolling back");
                    journal.live.studies = journal.saved_studies.clone();
                    first_err.get_or_insert(err);
                }
            }
            journal.studies_dirty = false;
        }

        first_err.map_or(Ok(()), Err)
    }

    async fn append_run(&self, run: NewScrapingRun) -> StoreResult<ScrapingRun> {
        let mut journal = self.inner.lock().await;
        let run = run.into_run(journal.live.allocate());
        let path = self.root.join(RUNS_FILE);
        let mut line = serde_json::to_vec(&run)?;
        line.push(b'\n');
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        file.write_all(&line)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        file.flush().await.map_err(|e| StoreError::io(&path, e))?;
        journal.live.runs.push(run.clone());
        Ok(run)
    }

    async fn recent_runs(&self, limit: usize) -> StoreResult<Vec<ScrapingRun>> {
        Ok(self.inner.lock().await.live.recent_runs(limit))
    }

    async fn drugs(&self) -> StoreResult<Vec<Stored<CanonicalDrug>>> {
        Ok(self.inner.lock().await.live.drugs.clone())
    }

    async fn studies(&self) -> StoreResult<Vec<Stored<CanonicalStudy>>> {
        Ok(self
            .inner
            .lock()
            .await
            .live
            .studies
            .values()
            .cloned()
            .collect())
    }
}

async fn read_snapshot<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

async fn write_snapshot<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

async fn read_runs(path: &Path) -> StoreResult<Vec<ScrapingRun>> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StoreError::io(path, err)),
    };
    let mut runs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ScrapingRun>(line) {
            Ok(run) => runs.push(run),
            // a torn final line from an interrupted append
            Err(err) => warn!(line = idx + 1, %err, "skipping unreadable run-log row"),
        }
    }
    Ok(runs)
}
