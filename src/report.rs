//! Result aggregation and report generation
//!
//! This module owns the in-memory store of recorded crawl results and the
//! final JSON artifact. Results are kept in two views over the same records:
//! by status class (`"4xx"`, `"5xx"`) and by exact status code. The report is
//! a single JSON object exposing both views, written to a file named after
//! the audited domain.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single recorded fetch outcome with an error-range status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// The URL that answered with an error status
    pub url: String,

    /// The page that referenced it
    pub referrer: String,

    /// The exact HTTP status code
    pub status: u16,
}

/// Accumulated crawl results, viewed by status class and by exact code
///
/// Appends preserve fetch-completion order within every bucket. The class
/// buckets `"4xx"` and `"5xx"` are always present, even when empty.
#[derive(Debug)]
pub struct ResultStore {
    by_class: BTreeMap<String, Vec<CrawlResult>>,
    by_code: BTreeMap<u16, Vec<CrawlResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        let mut by_class = BTreeMap::new();
        by_class.insert("4xx".to_string(), Vec::new());
        by_class.insert("5xx".to_string(), Vec::new());

        Self {
            by_class,
            by_code: BTreeMap::new(),
        }
    }

    /// Appends a result to its status-class bucket and its exact-code bucket
    pub fn record(&mut self, result: CrawlResult) {
        let class = format!("{}xx", result.status / 100);

        self.by_class
            .entry(class)
            .or_default()
            .push(result.clone());
        self.by_code.entry(result.status).or_default().push(result);
    }

    /// Number of records in a status-class bucket (`"4xx"`, `"5xx"`)
    pub fn class_count(&self, class: &str) -> usize {
        self.by_class.get(class).map_or(0, Vec::len)
    }

    /// Records in a status-class bucket, in completion order
    pub fn class_records(&self, class: &str) -> &[CrawlResult] {
        self.by_class.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records for an exact status code, in completion order
    pub fn code_records(&self, status: u16) -> &[CrawlResult] {
        self.by_code.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of recorded results
    pub fn len(&self) -> usize {
        self.by_code.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

// The report is one flat JSON object: class keys first, then one key per
// exact status code encountered, each holding the records in completion
// order. A record with a given code therefore appears twice, once under its
// class and once under the code itself.
impl Serialize for ResultStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.by_class.len() + self.by_code.len()))?;
        for (class, records) in &self.by_class {
            map.serialize_entry(class, records)?;
        }
        for (code, records) in &self.by_code {
            map.serialize_entry(&code.to_string(), records)?;
        }
        map.end()
    }
}

/// Serializes the store and writes the report artifact
///
/// Creates the parent directory if it does not exist yet. Safe to call while
/// the pipeline still holds undrained work; it snapshots whatever has been
/// recorded so far.
pub fn write_report(store: &ResultStore, path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(store)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}
