//! File-backed key-value adapter.
//!
//! Mirrors the key-value layout the application has always used: one
//! `user_audits_<email>.json` document per user plus a derived
//! `all_audits.json` global view. The store owns an in-memory index and
//! treats the files as a write-through cache; reads are served from the
//! index, every write lands on disk before the index advances.
//!
//! The global view is never authoritative. It is rebuilt after every write
//! by re-reading **every** per-user document found by directory scan, so a
//! user created after startup can never be missing from the combined list.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use scrutiny_core::entities::{Audit, StatusChange};

use crate::AuditStore;
use crate::error::StoreError;

const USER_PREFIX: &str = "user_audits_";
const GLOBAL_FILE: &str = "all_audits.json";

/// Directory-of-JSON-documents store.
#[derive(Debug)]
pub struct LocalStore {
    data_dir: PathBuf,
    /// Owner email -> that user's audits, in insertion order.
    index: BTreeMap<String, Vec<Audit>>,
}

impl LocalStore {
    /// Open (and create if needed) the store under `data_dir`, loading
    /// every per-user document into the index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the directory cannot be created or a
    /// document fails to parse.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let mut index = BTreeMap::new();
        for (owner, path) in scan_user_files(&data_dir)? {
            index.insert(owner, read_audits(&path)?);
        }
        Ok(Self { data_dir, index })
    }

    /// The directory this store reads and writes.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn user_path(&self, owner: &str) -> PathBuf {
        self.data_dir.join(format!("{USER_PREFIX}{owner}.json"))
    }

    /// Locate the audit's owner and position within that owner's bucket.
    fn position_of(&self, id: &str) -> Option<(String, usize)> {
        self.index.iter().find_map(|(owner, audits)| {
            audits
                .iter()
                .position(|a| a.id == id)
                .map(|pos| (owner.clone(), pos))
        })
    }

    /// Persist one owner's bucket, then rebuild the derived global view.
    ///
    /// The rebuild reads every per-user file fresh from disk rather than
    /// concatenating the index, so the combined document can never go stale
    /// relative to the per-user documents.
    fn persist(&self, owner: &str, audits: &[Audit]) -> Result<(), StoreError> {
        write_json(&self.user_path(owner), audits)?;
        self.rebuild_global()
    }

    fn rebuild_global(&self) -> Result<(), StoreError> {
        let mut all = Vec::new();
        for (_, path) in scan_user_files(&self.data_dir)? {
            all.extend(read_audits(&path)?);
        }
        write_json(&self.data_dir.join(GLOBAL_FILE), &all)
    }
}

impl AuditStore for LocalStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Audit>, StoreError> {
        match owner {
            Some(owner) => Ok(self.index.get(owner).cloned().unwrap_or_default()),
            None => Ok(self.index.values().flatten().cloned().collect()),
        }
    }

    async fn create(&mut self, audit: &Audit) -> Result<(), StoreError> {
        let mut bucket = self
            .index
            .get(&audit.owner_id)
            .cloned()
            .unwrap_or_default();
        bucket.push(audit.clone());
        self.persist(&audit.owner_id, &bucket)?;
        self.index.insert(audit.owner_id.clone(), bucket);
        Ok(())
    }

    async fn update(&mut self, audit: &Audit) -> Result<Audit, StoreError> {
        let (owner, pos) = self.position_of(&audit.id).ok_or(StoreError::NoResult)?;
        let mut bucket = self.index[&owner].clone();
        bucket[pos] = audit.clone();
        self.persist(&owner, &bucket)?;
        self.index.insert(owner, bucket);
        Ok(audit.clone())
    }

    async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some((owner, pos)) = self.position_of(id) else {
            return Ok(false);
        };
        let mut bucket = self.index[&owner].clone();
        bucket.remove(pos);
        self.persist(&owner, &bucket)?;
        self.index.insert(owner, bucket);
        Ok(true)
    }

    async fn update_status(
        &mut self,
        id: &str,
        entry: &StatusChange,
    ) -> Result<Audit, StoreError> {
        let (owner, pos) = self.position_of(id).ok_or(StoreError::NoResult)?;
        let new_status = entry
            .new_status
            .ok_or_else(|| StoreError::Query("status entry carries no new status".into()))?;

        let mut bucket = self.index[&owner].clone();
        let audit = &mut bucket[pos];
        audit.status_log.push(entry.clone());
        audit.status = new_status;
        // Derived locally, but kept written so the documents stay portable
        // to the remote backend.
        audit.is_archived = new_status.is_archived();
        let updated = audit.clone();

        self.persist(&owner, &bucket)?;
        self.index.insert(owner, bucket);
        Ok(updated)
    }
}

/// Enumerate `(owner email, path)` for every per-user document on disk.
fn scan_user_files(data_dir: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(stem) = name
            .strip_prefix(USER_PREFIX)
            .and_then(|rest| rest.strip_suffix(".json"))
        {
            files.push((stem.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

fn read_audits(path: &Path) -> Result<Vec<Audit>, StoreError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json(path: &Path, audits: &[Audit]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(audits)?;
    fs::write(path, json)?;
    Ok(())
}
