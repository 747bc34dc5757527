//! Linksweep: a broken-link auditor for a single domain
//!
//! This crate implements a concurrent crawler that walks every page reachable
//! within one domain, records URLs that answer with 4xx/5xx statuses together
//! with the page that referenced them, and writes a JSON report once the
//! crawl is exhausted.

pub mod config;
pub mod crawler;
pub mod report;
pub mod scope;

use thiserror::Error;

/// Main error type for linksweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Domain must not be empty")]
    EmptyDomain,

    #[error("Domain must be a bare hostname without a scheme: {0}")]
    SchemeInDomain(String),

    #[error("Domain must not contain a path or whitespace: {0}")]
    MalformedDomain(String),
}

/// Result type alias for linksweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use report::{CrawlResult, ResultStore};
pub use scope::CrawlScope;
