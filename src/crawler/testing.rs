//! In-memory page fetcher for unit tests

use crate::crawler::fetcher::{FetchError, PageFetcher, PageFields, WorkshopField};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Builds page fields from an optional workshop id and item image
pub fn fields(workshop_id: Option<u64>, item_image: Option<&str>) -> PageFields {
    PageFields {
        workshop_id: workshop_id.map_or(WorkshopField::Absent, WorkshopField::Id),
        item_image: item_image.map(str::to_string),
    }
}

enum Script {
    Page(PageFields),
    Failure,
}

/// Serves canned page fields and records every URI it was asked for
///
/// Unknown URIs fail with a 404 status.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Script>,
    index: Vec<String>,
    calls: Mutex<Vec<String>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, uri: &str, fields: PageFields) -> Self {
        self.pages.insert(uri.to_string(), Script::Page(fields));
        self
    }

    pub fn with_failure(mut self, uri: &str) -> Self {
        self.pages.insert(uri.to_string(), Script::Failure);
        self
    }

    pub fn with_index(mut self, uris: &[&str]) -> Self {
        self.index = uris.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Cancels `token` once the n-th fetch has returned
    pub fn cancel_after(mut self, fetches: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((fetches, token));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, uri: &str) -> Result<PageFields, FetchError> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(uri.to_string());
            calls.len()
        };

        if let Some((after, token)) = &self.cancel_after {
            if count >= *after {
                token.cancel();
            }
        }

        match self.pages.get(uri) {
            Some(Script::Page(fields)) => Ok(fields.clone()),
            Some(Script::Failure) => Err(FetchError::Status {
                uri: uri.to_string(),
                status: 500,
            }),
            None => Err(FetchError::Status {
                uri: uri.to_string(),
                status: 404,
            }),
        }
    }

    async fn discover(&self, _index_uri: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.index.clone())
    }
}
