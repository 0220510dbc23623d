//! Crawler coordinator - run orchestration logic
//!
//! This module sequences a full run:
//! - Acquiring the source list (discovering it on the first run)
//! - Merging it into the cache
//! - Crawling pending records, persisting on every exit path
//! - Regenerating the grouped skin configuration

use crate::config::Config;
use crate::crawler::crawl::{crawl, CrawlOutcome, ProgressUpdate};
use crate::crawler::fetcher::{FetchError, HttpPageFetcher, PageFetcher};
use crate::output::{write_grouped_config, GroupedConfig};
use crate::storage::{Cache, CacheStore, JsonStore};
use crate::SkinmapError;
use tokio_util::sync::CancellationToken;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing was pending; only the configuration was regenerated
    UpToDate { records: usize },

    /// All pending records were crawled and the configuration regenerated
    Completed(CrawlOutcome),

    /// Crawl stopped early; cache saved, configuration left as it was
    Cancelled(CrawlOutcome),
}

/// Main run coordinator structure
pub struct Coordinator<F, S = JsonStore> {
    config: Config,
    store: S,
    fetcher: F,
}

impl Coordinator<HttpPageFetcher, JsonStore> {
    /// Creates a coordinator with the HTTP fetcher and JSON files from `config`
    pub fn from_config(config: Config) -> Result<Self, SkinmapError> {
        let fetcher = HttpPageFetcher::new(&config)?;
        let store = JsonStore::from_config(&config.paths);
        Ok(Self::new(config, store, fetcher))
    }
}

impl<F, S> Coordinator<F, S>
where
    F: PageFetcher,
    S: CacheStore,
{
    pub fn new(config: Config, store: S, fetcher: F) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs discovery, merge, crawl, persist and aggregation
    ///
    /// The cache is persisted after the crawl whether it finished, was
    /// cancelled or failed. The configuration file is only rewritten when
    /// nothing was pending or the crawl finished.
    pub async fn run(&self, token: &CancellationToken) -> Result<RunOutcome, SkinmapError> {
        let source_list = self.acquire_source_list().await?;

        let mut cache = self.store.load_cache()?;
        let added = self.store.merge(&mut cache, &source_list)?;
        tracing::info!("Cache contains {} items ({} new).", cache.len(), added);

        let pending = cache.pending_count();
        if pending == 0 {
            tracing::info!(
                "The list is up to date. To check for new skins, run again with --rediscover."
            );
            self.write_output(&cache)?;
            return Ok(RunOutcome::UpToDate {
                records: cache.len(),
            });
        }

        tracing::info!("{} items will be fetched. Starting the crawl.", pending);

        let interval = self.config.crawler.progress_interval.max(1);
        let result = crawl(cache.pending_mut(), &self.fetcher, token, |p| {
            log_progress(p, interval)
        })
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.save_after_failure(&cache, &e);
                return Err(e.into());
            }
        };

        tracing::info!("Saving the cache file.");
        self.store.persist_cache(&cache)?;

        if outcome.cancelled {
            tracing::warn!(
                "Crawl stopped with {} items still pending; run again to resume.",
                cache.pending_count()
            );
            return Ok(RunOutcome::Cancelled(outcome));
        }

        tracing::info!(
            "Crawl finished: {} resolved, {} ignored, {} inconsistent.",
            outcome.resolved,
            outcome.ignored,
            outcome.inconsistent
        );
        self.write_output(&cache)?;

        Ok(RunOutcome::Completed(outcome))
    }

    /// Regenerates the configuration from the cache without fetching anything
    pub fn export(&self) -> Result<GroupedConfig, SkinmapError> {
        let cache = self.store.load_cache()?;
        tracing::info!("Cache contains {} items.", cache.len());
        self.write_output(&cache)
    }

    /// Loads the source list, discovering and saving it if none exists
    async fn acquire_source_list(&self) -> Result<Vec<String>, SkinmapError> {
        if let Some(list) = self.store.load_source_list()? {
            tracing::debug!("Loaded {} skin pages from the source list", list.len());
            return Ok(list);
        }

        let index_url = &self.config.fetcher.index_url;
        tracing::info!("No source list found, discovering skin pages from {}", index_url);

        let list = self.fetcher.discover(index_url).await?;
        self.store.save_source_list(&list)?;
        tracing::info!("Discovered {} skin pages.", list.len());

        Ok(list)
    }

    fn write_output(&self, cache: &Cache) -> Result<GroupedConfig, SkinmapError> {
        tracing::info!("Recreating the plugin configuration file.");
        let grouped = GroupedConfig::build(cache);
        write_grouped_config(&grouped, &self.config.paths.output)?;
        tracing::info!(
            "Wrote {} skins for {} items to {}",
            grouped.skin_count(),
            grouped.skins.len(),
            self.config.paths.output.display()
        );
        Ok(grouped)
    }

    /// Keeps the progress made before a fetch error
    ///
    /// A failure to save is logged; the fetch error is what gets returned.
    fn save_after_failure(&self, cache: &Cache, error: &FetchError) {
        tracing::error!("Crawl failed: {}", error);
        match self.store.persist_cache(cache) {
            Ok(()) => tracing::info!(
                "Saved the cache; {} items are still pending.",
                cache.pending_count()
            ),
            Err(save_err) => tracing::error!("Failed to save the cache: {}", save_err),
        }
    }
}

fn log_progress(progress: &ProgressUpdate<'_>, interval: usize) {
    if progress.current % interval == 0 || progress.current == progress.total {
        let percent = progress.current as f64 / progress.total as f64 * 100.0;
        tracing::info!(
            "[{}/{}] {:.0}% ({})",
            progress.current,
            progress.total,
            percent,
            progress.uri
        );
    }
}
