//! Storage module for persisting crawl data
//!
//! This module handles everything that touches disk between runs:
//! - The skin page cache (`cache.json`), one record per page URI
//! - The source list of page URIs produced by discovery (`skinslist.json`)
//! - Whole-file JSON snapshots written through a temp file and rename

mod json;
mod traits;

pub use json::{read_json, write_json_atomic, JsonStore};
pub use traits::{CacheStore, StorageError, StorageResult};

use crate::state::RecordState;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::HashSet;
use tracing::warn;

/// A cached skin page and what is known about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct CrawlRecord {
    pub uri: String,
    pub state: RecordState,
}

impl CrawlRecord {
    /// Creates a record that has yet to be crawled
    pub fn pending(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            state: RecordState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }
}

/// On-disk shape of a record
///
/// `workshopid == -1` and an empty `itemid` mark an unresolved page; `ignore`
/// is only written when set. The workshop id is kept as a JSON number so any
/// unsigned id survives a load and save unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRecord {
    uri: String,
    #[serde(default = "unresolved_workshop_id")]
    workshopid: Number,
    #[serde(default)]
    itemid: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    ignore: bool,
}

fn unresolved_workshop_id() -> Number {
    Number::from(-1i64)
}

impl From<RawRecord> for CrawlRecord {
    fn from(raw: RawRecord) -> Self {
        let state = RecordState::from_fields(raw.workshopid.as_u64(), raw.itemid, raw.ignore);
        if state.is_ignored() && !raw.ignore {
            warn!(
                "Cached page {} has workshop id {} but no item shortname, ignoring it",
                raw.uri, raw.workshopid
            );
        }

        Self {
            uri: raw.uri,
            state,
        }
    }
}

impl From<CrawlRecord> for RawRecord {
    fn from(record: CrawlRecord) -> Self {
        let (workshop_id, itemid, ignore) = record.state.to_fields();
        Self {
            uri: record.uri,
            workshopid: workshop_id.map_or_else(unresolved_workshop_id, Number::from),
            itemid,
            ignore,
        }
    }
}

/// Ordered collection of crawl records, keyed by URI
///
/// Insertion order is the crawl order and the order skins appear in the
/// generated configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cache {
    records: Vec<CrawlRecord>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CrawlRecord] {
        &self.records
    }

    /// Mutable access to every record, in cache order
    #[cfg(test)]
    pub(crate) fn records_mut(&mut self) -> std::slice::IterMut<'_, CrawlRecord> {
        self.records.iter_mut()
    }

    /// Returns true if a record with exactly this URI exists
    pub fn contains(&self, uri: &str) -> bool {
        self.records.iter().any(|r| r.uri == uri)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, uri: &str) -> Option<&CrawlRecord> {
        self.records.iter().find(|r| r.uri == uri)
    }

    /// Number of records that still need to be crawled
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }

    /// Mutable access to pending records, in cache order
    pub fn pending_mut(&mut self) -> impl Iterator<Item = &mut CrawlRecord> {
        self.records.iter_mut().filter(|r| r.is_pending())
    }

    /// Appends a pending record for every URI not already cached
    ///
    /// Existing records are left untouched. Returns the number of records added.
    pub fn merge(&mut self, source_list: &[String]) -> usize {
        let mut known: HashSet<String> = self.records.iter().map(|r| r.uri.clone()).collect();
        let before = self.records.len();

        for uri in source_list {
            if known.insert(uri.clone()) {
                self.records.push(CrawlRecord::pending(uri.clone()));
            }
        }

        self.records.len() - before
    }
}

impl From<Vec<CrawlRecord>> for Cache {
    fn from(records: Vec<CrawlRecord>) -> Self {
        Self { records }
    }
}
