//! File-backed bookmark store.
//!
//! The data directory holds one `{id}.json` file per bookmark plus an
//! `index.json` manifest. The index is loaded on first use and kept in
//! memory for the lifetime of the store; every mutation rewrites it
//! wholesale.

mod atomic;
mod types;

pub use types::{Index, IndexItem, Meta, Record, record_filename};

use atomic::atomic_write;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the manifest file inside the data directory.
pub const INDEX_FILENAME: &str = "index.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage failure at {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct BookmarkStore {
    data_dir: PathBuf,
    index: Option<Index>,
}

impl BookmarkStore {
    /// Open a store rooted at `data_dir`. Nothing touches the disk until the
    /// first operation.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            index: None,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILENAME)
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.data_dir.join(record_filename(id))
    }

    /// Load the index, creating the data directory and an empty index file
    /// if none exists yet.
    pub fn ensure_index(&mut self) -> Result<&Index, StoreError> {
        let index = match self.index.take() {
            Some(index) => index,
            None => self.load_or_init_index()?,
        };
        Ok(self.index.insert(index))
    }

    fn load_or_init_index(&self) -> Result<Index, StoreError> {
        let path = self.index_path();
        if path.exists() {
            return read_json(&path);
        }

        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Storage {
            path: self.data_dir.clone(),
            source,
        })?;
        let index = Index::default();
        write_json(&path, &index)?;
        info!(data_dir = %self.data_dir.display(), "Initialized empty bookmark index");
        Ok(index)
    }

    /// Store a new bookmark. The record file is written before the index, so
    /// a failed record write never leaves a dangling index entry.
    pub fn create(&mut self, meta: Meta) -> Result<Record, StoreError> {
        let mut next = self.ensure_index()?.clone();

        let id = next.count;
        let now = chrono::Utc::now().timestamp_millis();
        let record = Record {
            id,
            filename: record_filename(id),
            meta,
            created_at: now,
            updated_at: now,
        };

        write_json(&self.record_path(id), &record)?;

        next.items.push(IndexItem::from_record(&record));
        next.count += 1;
        write_json(&self.index_path(), &next)?;
        self.index = Some(next);

        info!(id, "Created bookmark");
        Ok(record)
    }

    /// Read a record straight from its file. A missing file is `Ok(None)`.
    pub fn read(&self, id: u64) -> Result<Option<Record>, StoreError> {
        let path = self.record_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Storage { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse { path, source })
    }

    pub fn list(&mut self) -> Result<&Index, StoreError> {
        self.ensure_index()
    }

    /// Remove a bookmark and its file. Returns `false` when no index entry
    /// has the given id.
    pub fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let mut next = self.ensure_index()?.clone();

        let before = next.items.len();
        next.items.retain(|item| item.id != id);
        if next.items.len() == before {
            debug!(id, "No bookmark to delete");
            return Ok(false);
        }

        // file before index: a failed removal leaves the index as it was
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed record file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Record file already missing")
            }
            Err(source) => return Err(StoreError::Storage { path, source }),
        }

        write_json(&self.index_path(), &next)?;
        self.index = Some(next);

        info!(id, "Deleted bookmark");
        Ok(true)
    }

    /// Remove the whole data directory and start over with an empty index.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_dir_all(&self.data_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Storage {
                    path: self.data_dir.clone(),
                    source,
                });
            }
        }
        self.index = None;
        self.ensure_index()?;

        info!(data_dir = %self.data_dir.display(), "Cleared all bookmarks");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Storage {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &content).map_err(|source| StoreError::Storage {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}
