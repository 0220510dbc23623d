//! Page fetcher capability and its HTTP implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `PageFetcher` trait the crawl loop depends on
//! - Building the HTTP client with the configured user agent and timeouts
//! - Fetching skin pages and the discovery index page
//! - Error classification
//!
//! No retries happen here; a failed fetch fails the crawl pass.

use crate::config::{Config, FetcherConfig, SelectorConfig, UserAgentConfig};
use crate::crawler::parser::{extract_index_links, parse_skin_page};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching or parsing a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {uri}: {source}")]
    Http { uri: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {uri}")]
    Status { uri: String, status: u16 },

    #[error("Invalid URL '{uri}': {source}")]
    InvalidUrl {
        uri: String,
        source: url::ParseError,
    },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// What the workshop id element on a skin page contained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkshopField {
    /// No element, or an empty one: the page has no workshop skin
    Absent,

    /// A numeric workshop id
    Id(u64),

    /// An element whose text is not a workshop id
    Malformed(String),
}

/// Fields extracted from a single skin page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub workshop_id: WorkshopField,

    /// `src` of the image of the item the skin applies to
    pub item_image: Option<String>,
}

impl PageFields {
    /// A page with no skin data at all
    pub fn empty() -> Self {
        Self {
            workshop_id: WorkshopField::Absent,
            item_image: None,
        }
    }
}

/// Resolves URIs to extracted page fields
///
/// Implementations own all network policy (timeouts, user agent); the crawl
/// loop only sees fields or a `FetchError`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a skin page and extracts its fields
    async fn fetch(&self, uri: &str) -> Result<PageFields, FetchError>;

    /// Fetches the index page and returns the skin page URIs it links to
    async fn discover(&self, index_uri: &str) -> Result<Vec<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `fetcher` - Timeout settings
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetcher.request_timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by reqwest and CSS selectors
pub struct HttpPageFetcher {
    client: Client,
    selectors: SelectorConfig,
}

impl HttpPageFetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client =
            build_http_client(&config.fetcher, &config.user_agent).map_err(FetchError::Client)?;

        Ok(Self::with_client(client, config.selectors.clone()))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, selectors: SelectorConfig) -> Self {
        Self { client, selectors }
    }

    /// GETs a page and returns its body
    ///
    /// Only 2xx responses are accepted.
    async fn get_text(&self, uri: &str) -> Result<String, FetchError> {
        let http_err = |source: reqwest::Error| FetchError::Http {
            uri: uri.to_string(),
            source,
        };

        let response = self.client.get(uri).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(http_err)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, uri: &str) -> Result<PageFields, FetchError> {
        let body = self.get_text(uri).await?;
        parse_skin_page(&body, &self.selectors).map_err(FetchError::Selector)
    }

    async fn discover(&self, index_uri: &str) -> Result<Vec<String>, FetchError> {
        let base_url = Url::parse(index_uri).map_err(|source| FetchError::InvalidUrl {
            uri: index_uri.to_string(),
            source,
        })?;

        let body = self.get_text(index_uri).await?;
        extract_index_links(&body, &base_url, &self.selectors.index_link)
            .map_err(FetchError::Selector)
    }
}
