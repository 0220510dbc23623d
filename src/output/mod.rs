//! Output module for generating the skin configuration and reports
//!
//! This module handles:
//! - Grouping resolved skins by item into the plugin configuration file
//! - Cache statistics for the `--stats` mode

mod grouped;
pub mod stats;

pub use grouped::{write_grouped_config, GroupedConfig, SkinGroup};
pub use stats::{print_statistics, CacheStatistics};
