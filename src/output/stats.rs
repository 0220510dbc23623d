//! Statistics generation from the crawl cache
//!
//! This module provides functionality for extracting and displaying
//! cache statistics.

use crate::output::GroupedConfig;
use crate::storage::Cache;

/// Cache statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Total number of cached pages
    pub total_records: usize,

    pub resolved: usize,
    pub ignored: usize,
    pub pending: usize,

    /// Number of distinct items with at least one skin
    pub item_groups: usize,
}

impl CacheStatistics {
    /// Computes statistics for a cache
    pub fn from_cache(cache: &Cache) -> Self {
        let mut stats = Self {
            total_records: cache.len(),
            item_groups: GroupedConfig::build(cache).skins.len(),
            ..Self::default()
        };

        for record in cache.records() {
            if record.state.is_resolved() {
                stats.resolved += 1;
            } else if record.state.is_ignored() {
                stats.ignored += 1;
            } else {
                stats.pending += 1;
            }
        }

        stats
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CacheStatistics) {
    println!("=== Cache Statistics ===\n");

    println!("Records: {}", stats.total_records);
    for (label, count) in [
        ("Resolved", stats.resolved),
        ("Ignored", stats.ignored),
        ("Pending", stats.pending),
    ] {
        let percentage = if stats.total_records > 0 {
            (count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    println!("Items with skins: {}", stats.item_groups);

    if stats.pending > 0 {
        println!("\n{} pages will be fetched on the next run.", stats.pending);
    } else {
        println!("\nThe cache is up to date.");
    }
}
