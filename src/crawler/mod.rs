//! Crawler module for the crawl pipeline
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and outcome classification
//! - HTML parsing and candidate extraction
//! - The deduplicating frontier
//! - Bounded worker pools and termination detection
//! - Overall crawl coordination and report flushing

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod tracker;

pub use coordinator::{run_crawl, CrawlSession};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use frontier::Frontier;
pub use parser::extract_candidates;
pub use tracker::TaskTracker;

use crate::config::CrawlConfig;
use crate::SweepError;

/// Unit of work for the fetch pool
#[derive(Debug, Clone)]
pub struct FetchTask {
    /// The page that referenced this URL (empty for the seed)
    pub referrer: String,

    /// The URL to fetch
    pub url: String,
}

/// Unit of work for the extract pool
#[derive(Debug, Clone)]
pub struct ExtractTask {
    /// The URL the content was fetched from
    pub url: String,

    /// The page that referenced `url`
    pub referrer: String,

    /// The fetched page body
    pub content: String,
}

/// Runs a complete crawl of the configured domain
///
/// This is the main entry point. It seeds the frontier from the domain's
/// root, drives both worker pools until the crawl is exhausted (or
/// interrupted), and writes the report. An unexpected failure propagates
/// with no report written.
pub async fn crawl(config: CrawlConfig) -> Result<(), SweepError> {
    run_crawl(config).await
}
