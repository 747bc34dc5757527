//! Crawl configuration
//!
//! The whole configuration is derived from the command line: the target
//! domain plus a handful of knobs with fixed defaults. Validation happens
//! here so the crawler can assume a well-formed domain everywhere else.

use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Default number of concurrent in-flight HTTP requests
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Default number of concurrent page-parsing tasks
pub const DEFAULT_EXTRACT_CONCURRENCY: usize = 15;

/// Configuration for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The bare domain being audited (hostname, optionally `host:port`)
    pub domain: String,

    /// Scheme used for the seed URL and for rewriting root-relative links
    pub scheme: String,

    /// Maximum concurrent fetch tasks
    pub fetch_concurrency: usize,

    /// Maximum concurrent extract tasks
    pub extract_concurrency: usize,

    /// Directory the report file is written into
    pub report_dir: PathBuf,
}

impl CrawlConfig {
    /// Creates a configuration for the given domain with default settings
    ///
    /// The domain must be a bare hostname: no scheme, no path, no whitespace.
    /// An explicit `host:port` form is accepted.
    pub fn new(domain: &str) -> ConfigResult<Self> {
        let domain = domain.trim();

        if domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if domain.contains("://") {
            return Err(ConfigError::SchemeInDomain(domain.to_string()));
        }
        if domain.contains('/') || domain.contains(char::is_whitespace) {
            return Err(ConfigError::MalformedDomain(domain.to_string()));
        }

        Ok(Self {
            domain: domain.to_string(),
            scheme: "https".to_string(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            extract_concurrency: DEFAULT_EXTRACT_CONCURRENCY,
            report_dir: PathBuf::from("./reports"),
        })
    }

    /// Overrides the report output directory
    pub fn with_report_dir(mut self, dir: &Path) -> Self {
        self.report_dir = dir.to_path_buf();
        self
    }

    /// Overrides the seed scheme (the crawl normally seeds over https)
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// The URL the crawl starts from
    pub fn seed_url(&self) -> String {
        format!("{}://{}/", self.scheme, self.domain)
    }

    /// Path of the report artifact, named after the domain
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(format!("{}.json", self.domain))
    }
}
