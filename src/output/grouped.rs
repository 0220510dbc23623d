//! Grouped skin configuration
//!
//! Turns the flat cache into one group per item shortname, each listing the
//! workshop ids of its skins. The file layout is what the skins plugin reads.

use crate::storage::{write_json_atomic, Cache, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Skins available for a single item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinGroup {
    #[serde(rename = "Item Shortname")]
    pub item_shortname: String,

    /// Always empty; filled in by server operators
    #[serde(rename = "Permission")]
    pub permission: String,

    /// Workshop ids, in cache order
    #[serde(rename = "Skins")]
    pub skins: Vec<u64>,
}

/// The generated configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedConfig {
    #[serde(rename = "Skins")]
    pub skins: Vec<SkinGroup>,
}

impl GroupedConfig {
    /// Groups resolved records by item shortname
    ///
    /// Groups appear in the order their item is first seen. Workshop ids keep
    /// cache order and are neither sorted nor deduplicated. Pending and
    /// ignored records are left out.
    pub fn build(cache: &Cache) -> Self {
        let mut skins: Vec<SkinGroup> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in cache.records() {
            let (Some(workshop_id), Some(item_id)) =
                (record.state.workshop_id(), record.state.item_id())
            else {
                continue;
            };

            let slot = *index.entry(item_id).or_insert_with(|| {
                skins.push(SkinGroup {
                    item_shortname: item_id.to_string(),
                    permission: String::new(),
                    skins: Vec::new(),
                });
                skins.len() - 1
            });

            skins[slot].skins.push(workshop_id);
        }

        Self { skins }
    }

    /// Total number of workshop ids across all groups
    pub fn skin_count(&self) -> usize {
        self.skins.iter().map(|g| g.skins.len()).sum()
    }

    pub fn group(&self, item_shortname: &str) -> Option<&SkinGroup> {
        self.skins
            .iter()
            .find(|g| g.item_shortname == item_shortname)
    }
}

/// Writes the grouped configuration, replacing any previous file
pub fn write_grouped_config(config: &GroupedConfig, path: &Path) -> StorageResult<()> {
    write_json_atomic(path, config)
}
