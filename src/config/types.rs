use serde::Deserialize;
use std::path::PathBuf;

/// Page listing every skin; discovery collects the links found on it
pub const DEFAULT_INDEX_URL: &str = "https://rustlabs.com/skins#order=name,desc";

/// Main configuration structure for skinmap
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub crawler: CrawlerConfig,
}

/// Locations of the files kept between runs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Discovered skin page URIs
    #[serde(rename = "source-list")]
    pub source_list: PathBuf,

    /// Per-page crawl cache
    pub cache: PathBuf,

    /// Generated grouped skin configuration
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_list: PathBuf::from("./skinslist.json"),
            cache: PathBuf::from("./cache.json"),
            output: PathBuf::from("./Skins.json"),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Index page used to discover skin pages
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "skinmap".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// CSS selectors used to pull fields out of pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Links to skin pages on the index page
    #[serde(rename = "index-link")]
    pub index_link: String,

    /// Element whose text is the workshop id
    #[serde(rename = "workshop-id")]
    pub workshop_id: String,

    /// Image whose `src` file name is the item shortname
    #[serde(rename = "item-image")]
    pub item_image: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            index_link: "#wrappah > a".to_string(),
            workshop_id: ".stats-table a".to_string(),
            item_image: "[data-name='skin-for'] .item-cell > img".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Log progress every N processed records
    #[serde(rename = "progress-interval")]
    pub progress_interval: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            progress_interval: 10,
        }
    }
}
