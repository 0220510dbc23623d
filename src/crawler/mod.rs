//! Crawler module for skin page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The page fetcher capability and its HTTP implementation
//! - HTML field extraction
//! - The sequential, cancellable crawl loop
//! - Overall run coordination

mod coordinator;
mod crawl;
mod fetcher;
mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, RunOutcome};
pub use crawl::{
    crawl, item_id_from_image, resolve_fields, CrawlOutcome, ProgressUpdate, Resolution,
};
pub use fetcher::{
    build_http_client, FetchError, HttpPageFetcher, PageFetcher, PageFields, WorkshopField,
};
pub use parser::{extract_index_links, parse_skin_page};

use crate::config::Config;
use crate::SkinmapError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for a run. It will:
/// 1. Load the source list, discovering it if missing
/// 2. Merge it into the cache
/// 3. Crawl pending pages until done or cancelled
/// 4. Save the cache
/// 5. Regenerate the grouped skin configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `token` - Cancelled to stop the crawl between pages
///
/// # Returns
///
/// * `Ok(RunOutcome)` - Run finished, was up to date, or was cancelled
/// * `Err(SkinmapError)` - Run failed; progress so far is saved
pub async fn run(config: Config, token: &CancellationToken) -> Result<RunOutcome, SkinmapError> {
    Coordinator::from_config(config)?.run(token).await
}
