//! JSON file storage implementation
//!
//! This module provides a file-based implementation of the CacheStore trait.
//! Each file is a pretty-printed JSON document replaced as a whole on every write.

use crate::config::PathsConfig;
use crate::storage::traits::{CacheStore, StorageError, StorageResult};
use crate::storage::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonStore {
    source_list_path: PathBuf,
    cache_path: PathBuf,
}

impl JsonStore {
    /// Creates a new JsonStore instance
    ///
    /// # Arguments
    ///
    /// * `source_list_path` - Path to the discovered page list
    /// * `cache_path` - Path to the crawl cache
    pub fn new(source_list_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source_list_path: source_list_path.into(),
            cache_path: cache_path.into(),
        }
    }

    /// Creates a store from the configured paths
    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.source_list, &paths.cache)
    }

    #[cfg(test)]
    pub(crate) fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl CacheStore for JsonStore {
    fn load_cache(&self) -> StorageResult<Cache> {
        Ok(read_json(&self.cache_path)?.unwrap_or_default())
    }

    fn persist_cache(&self, cache: &Cache) -> StorageResult<()> {
        tracing::debug!(
            "Persisting {} records to {}",
            cache.len(),
            self.cache_path.display()
        );
        write_json_atomic(&self.cache_path, cache)
    }

    fn load_source_list(&self) -> StorageResult<Option<Vec<String>>> {
        read_json(&self.source_list_path)
    }

    fn save_source_list(&self, source_list: &[String]) -> StorageResult<()> {
        write_json_atomic(&self.source_list_path, source_list)
    }

    fn remove_source_list(&self) -> StorageResult<()> {
        match std::fs::remove_file(&self.source_list_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                path: self.source_list_path.clone(),
                source,
            }),
        }
    }
}

/// Reads and decodes a JSON file
///
/// # Returns
///
/// * `Ok(Some(T))` - File exists and decoded
/// * `Ok(None)` - File does not exist
/// * `Err(StorageError)` - File exists but could not be read or decoded
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes a value as pretty JSON, replacing the file in one step
///
/// The document is written to a sibling `.tmp` file which is then renamed over
/// the target, so readers see either the old or the new snapshot.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let content = serde_json::to_vec_pretty(value)?;

    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = temp_path(path);
    std::fs::write(&tmp_path, content).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}
