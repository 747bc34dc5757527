//! URL scoping rules for the crawl
//!
//! This module decides which candidate URLs belong to the audited domain.
//! Candidates are compared by structured URL parsing — scheme and host as
//! distinct fields — rather than by string prefix, so a lookalike host that
//! merely shares a prefix or suffix with the target domain is never admitted.

use crate::{ConfigError, ConfigResult};
use url::Url;

/// The fixed scheme+domain scope a crawl is confined to
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// The configured domain, verbatim (may carry an explicit port)
    domain: String,

    /// Scheme used when rewriting root-relative candidates
    scheme: String,

    /// Host part of the configured domain
    host: String,

    /// Explicit port of the configured domain, if any
    port: Option<u16>,
}

impl CrawlScope {
    /// Builds a scope for the given bare domain
    ///
    /// `scheme` is only used for rewriting root-relative candidates; in-scope
    /// checks accept both `http` and `https` URLs on the configured host.
    pub fn new(domain: &str, scheme: &str) -> ConfigResult<Self> {
        // Parse once with the crawl scheme so a default port in the domain
        // string normalizes the same way candidate URLs do.
        let parsed = Url::parse(&format!("{}://{}/", scheme, domain))
            .map_err(|_| ConfigError::MalformedDomain(domain.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::MalformedDomain(domain.to_string()))?
            .to_string();

        Ok(Self {
            domain: domain.to_string(),
            scheme: scheme.to_string(),
            host,
            port: parsed.port(),
        })
    }

    /// Rewrites a root-relative candidate to an absolute URL on this domain
    ///
    /// Any other candidate is returned unchanged; whether it is crawlable is
    /// decided by [`CrawlScope::in_scope`].
    pub fn resolve(&self, candidate: &str) -> String {
        if candidate.starts_with('/') {
            format!("{}://{}{}", self.scheme, self.domain, candidate)
        } else {
            candidate.to_string()
        }
    }

    /// Returns true if `url` is an http(s) URL on exactly the configured host
    ///
    /// Rejects pseudo-schemes (`javascript:`, `mailto:`, `data:`, ...),
    /// candidates that do not parse as absolute URLs, and hosts that differ
    /// from the configured one in any way, port included.
    pub fn in_scope(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        parsed.host_str() == Some(self.host.as_str()) && parsed.port() == self.port
    }
}
