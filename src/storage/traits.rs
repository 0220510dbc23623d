//! Storage traits and error types
//!
//! This module defines the trait interface for cache backends and
//! associated error types.

use crate::storage::Cache;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// A missing file is never an error; loaders report it as empty state instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for cache backend implementations
///
/// Every persist is a full snapshot that replaces the previous state.
pub trait CacheStore {
    // ===== Cache =====

    /// Loads the cache, or an empty one if nothing was persisted yet
    fn load_cache(&self) -> StorageResult<Cache>;

    /// Writes the full cache, overwriting prior state
    fn persist_cache(&self, cache: &Cache) -> StorageResult<()>;

    /// Merges the source list into the cache and persists the result
    ///
    /// Newly discovered URIs survive a crash that happens before crawling starts.
    ///
    /// # Returns
    ///
    /// The number of records added
    fn merge(&self, cache: &mut Cache, source_list: &[String]) -> StorageResult<usize> {
        let added = cache.merge(source_list);
        self.persist_cache(cache)?;
        Ok(added)
    }

    // ===== Source List =====

    /// Loads the source list, or `None` if discovery never ran
    fn load_source_list(&self) -> StorageResult<Option<Vec<String>>>;

    /// Saves the source list produced by discovery
    fn save_source_list(&self, source_list: &[String]) -> StorageResult<()>;

    /// Removes the source list so the next run rediscovers pages
    fn remove_source_list(&self) -> StorageResult<()>;
}
