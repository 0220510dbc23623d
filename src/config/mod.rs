//! Configuration module for skinmap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use skinmap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("skinmap.toml")).unwrap();
//! println!("Cache file: {}", config.paths.cache.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, PathsConfig, SelectorConfig, UserAgentConfig,
    DEFAULT_INDEX_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
