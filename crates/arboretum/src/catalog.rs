//! File-backed catalog of tree entries
//!
//! Each entry is one `<id>.json` file in the data directory. The store reads
//! them all at startup into a concurrent map and keeps that map in step with
//! its own writes. Files changed behind its back are not noticed until the
//! next restart.

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// One catalog entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Root-relative path of the entry's image, e.g. `/oak.jpg`
    pub image_path: String,

    /// Display name
    pub name: String,

    /// Free-text description
    pub description: String,
}

impl CatalogEntry {
    /// Build an entry for an uploaded image file.
    pub fn for_upload(
        filename: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image_path: format!("/{}", filename),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Derive an entry id from a filename: everything before the first `.`.
///
/// `oak.jpg` and `oak.json` both map to `oak`, which is what ties an image
/// to its entry.
pub fn entry_id(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// The in-memory index of catalog entries and the directory backing it.
#[derive(Debug)]
pub struct CatalogStore {
    dir: PathBuf,
    entries: DashMap<String, CatalogEntry>,
}

impl CatalogStore {
    /// Create an empty store writing into `dir`, without reading it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: DashMap::new(),
        }
    }

    /// Load every `*.json` file in `dir`.
    ///
    /// Runs once at startup. A malformed file is an error naming that file;
    /// files with other extensions are skipped.
    pub fn load_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(dir);

        let read_dir = fs::read_dir(&store.dir).map_err(|e| CatalogError::io(&store.dir, e))?;
        for entry in read_dir {
            let entry = entry.map_err(|e| CatalogError::io(&store.dir, e))?;
            let path = entry.path();
            let is_file = entry
                .file_type()
                .map_err(|e| CatalogError::io(&path, e))?
                .is_file();
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some("json") {
                debug!(file = %path.display(), "skipping non-entry file");
                continue;
            }

            let bytes = fs::read(&path).map_err(|e| CatalogError::io(&path, e))?;
            let parsed: CatalogEntry =
                serde_json::from_slice(&bytes).map_err(|source| CatalogError::Json {
                    path: path.clone(),
                    source,
                })?;

            let filename = entry.file_name().to_string_lossy().into_owned();
            store.entries.insert(entry_id(&filename).to_string(), parsed);
        }

        debug!(dir = %store.dir.display(), count = store.len(), "loaded catalog");
        Ok(store)
    }

    /// Directory the entries live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backing file for an id.
    pub fn entry_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Get an entry by id.
    pub fn get(&self, id: &str) -> Result<CatalogEntry> {
        self.entries
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CatalogError::not_found("catalog entry", id))
    }

    /// Write an entry to `<id>.json` and then record it in the index.
    ///
    /// Returns the entry it replaced, if any. The index is left untouched
    /// when the write fails.
    pub async fn put(&self, id: &str, entry: CatalogEntry) -> Result<Option<CatalogEntry>> {
        let path = self.entry_path(id);
        let json = serde_json::to_vec_pretty(&entry).map_err(|source| CatalogError::Json {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| CatalogError::io(&path, e))?;

        debug!(id, file = %path.display(), "wrote catalog entry");
        Ok(self.entries.insert(id.to_string(), entry))
    }

    /// Undo a `put`: restore the previous entry, or remove the id entirely
    /// when there was none.
    pub async fn restore(&self, id: &str, previous: Option<CatalogEntry>) -> Result<()> {
        match previous {
            Some(entry) => {
                self.put(id, entry).await?;
            }
            None => {
                let path = self.entry_path(id);
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        warn!(id, file = %path.display(), "entry file already gone");
                    }
                    Err(e) => return Err(CatalogError::io(&path, e)),
                }
                self.entries.remove(id);
            }
        }
        Ok(())
    }

    /// Whether an id is present in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
