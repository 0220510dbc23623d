//! Sequential crawl loop over pending cache records
//!
//! One fetch is in flight at a time, in cache order. Cancellation is checked
//! between records only; a fetch that has started always completes.

use crate::crawler::fetcher::{FetchError, PageFetcher, PageFields, WorkshopField};
use crate::state::RecordState;
use crate::storage::CrawlRecord;
use tokio_util::sync::CancellationToken;

const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".webp", ".gif"];

/// Progress notification sent after every processed record
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a> {
    /// 1-based position of the record in this pass
    pub current: usize,
    /// Number of records in this pass
    pub total: usize,
    pub uri: &'a str,
    pub state: &'a RecordState,
}

/// Counters for one crawl pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Records fetched and updated
    pub processed: usize,
    pub resolved: usize,
    /// Records ignored because the page had no workshop id
    pub ignored: usize,
    /// Records ignored because the page had a workshop id but no usable item
    pub inconsistent: usize,
    /// True if the pass stopped early on cancellation
    pub cancelled: bool,
}

/// How a page's fields map onto a record state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Both identifiers were extracted
    Resolved { workshop_id: u64, item_id: String },

    /// No workshop id on the page
    Missing,

    /// Page format did not match what was expected
    ///
    /// Keeps the workshop id when one was extracted.
    Inconsistent {
        workshop_id: Option<u64>,
        reason: String,
    },
}

impl Resolution {
    /// The record state this resolution stores
    pub fn into_state(self) -> RecordState {
        match self {
            Self::Resolved {
                workshop_id,
                item_id,
            } => RecordState::Resolved {
                workshop_id,
                item_id,
            },
            Self::Missing => RecordState::ignored(),
            Self::Inconsistent { workshop_id, .. } => RecordState::Ignored {
                workshop_id,
                item_id: String::new(),
            },
        }
    }
}

/// Decides what a fetched page resolves to
///
/// A workshop id without a usable item image is treated like a page without a
/// skin, but reported as `Inconsistent` so it can be logged separately.
pub fn resolve_fields(fields: PageFields) -> Resolution {
    let workshop_id = match fields.workshop_id {
        WorkshopField::Absent => return Resolution::Missing,
        WorkshopField::Malformed(text) => {
            return Resolution::Inconsistent {
                workshop_id: None,
                reason: format!("workshop id '{}' is not a number", text),
            }
        }
        WorkshopField::Id(id) => id,
    };

    let Some(src) = fields.item_image else {
        return Resolution::Inconsistent {
            workshop_id: Some(workshop_id),
            reason: format!("workshop id {} has no item image", workshop_id),
        };
    };

    match item_id_from_image(&src) {
        Some(item_id) => Resolution::Resolved {
            workshop_id,
            item_id,
        },
        None => Resolution::Inconsistent {
            workshop_id: Some(workshop_id),
            reason: format!(
                "workshop id {} has an unusable item image '{}'",
                workshop_id, src
            ),
        },
    }
}

/// Derives an item shortname from an item image reference
///
/// Takes the file name after the last `/` and strips the image extension.
/// Dots inside the name are kept: `.../rifle.ak.png` → `rifle.ak`.
pub fn item_id_from_image(src: &str) -> Option<String> {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();

    let lower = file_name.to_ascii_lowercase();
    let stem = IMAGE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file_name[..file_name.len() - ext.len()])
        .unwrap_or(file_name);

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Crawls records in order, updating each one in place
///
/// Records that are not pending are skipped without a fetch. The token is
/// checked before each fetch; once cancelled, no further record is touched.
///
/// # Arguments
///
/// * `records` - Records to crawl, usually `Cache::pending_mut()`
/// * `fetcher` - Page fetcher
/// * `token` - Cancellation token polled between records
/// * `on_progress` - Called after every processed record
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Pass finished or was cancelled
/// * `Err(FetchError)` - A fetch failed; records before it stay updated
pub async fn crawl<'a, F, P>(
    records: impl IntoIterator<Item = &'a mut CrawlRecord>,
    fetcher: &F,
    token: &CancellationToken,
    mut on_progress: P,
) -> Result<CrawlOutcome, FetchError>
where
    F: PageFetcher + ?Sized,
    P: FnMut(&ProgressUpdate<'_>),
{
    let records: Vec<&mut CrawlRecord> = records.into_iter().filter(|r| r.is_pending()).collect();
    let total = records.len();
    let mut outcome = CrawlOutcome::default();

    for (index, record) in records.into_iter().enumerate() {
        if token.is_cancelled() {
            tracing::warn!(
                "Crawl cancelled after {} of {} records",
                outcome.processed,
                total
            );
            outcome.cancelled = true;
            break;
        }

        let fields = fetcher.fetch(&record.uri).await?;
        let resolution = resolve_fields(fields);

        match &resolution {
            Resolution::Resolved {
                workshop_id,
                item_id,
            } => {
                tracing::debug!("{} -> {} ({})", record.uri, workshop_id, item_id);
                outcome.resolved += 1;
            }
            Resolution::Missing => {
                tracing::debug!("{} has no workshop id, ignoring", record.uri);
                outcome.ignored += 1;
            }
            Resolution::Inconsistent { reason, .. } => {
                tracing::warn!("Ignoring {}: {}", record.uri, reason);
                outcome.inconsistent += 1;
            }
        }

        record.state = resolution.into_state();
        outcome.processed += 1;

        on_progress(&ProgressUpdate {
            current: index + 1,
            total,
            uri: &record.uri,
            state: &record.state,
        });
    }

    Ok(outcome)
}
