//! The crawl frontier
//!
//! Gate-keeps which URLs ever enter the pipeline. The frontier owns the set
//! of every URL admitted during the run; membership test and insert happen
//! under one lock so two extract workers discovering the same URL at the
//! same time can never both enqueue it.

use crate::crawler::tracker::TaskTracker;
use crate::crawler::FetchTask;
use crate::scope::CrawlScope;
use crate::SweepError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;

/// Deduplicating gate in front of the fetch pool
pub struct Frontier {
    scope: CrawlScope,
    seen: Mutex<HashSet<String>>,
    fetch_tx: UnboundedSender<FetchTask>,
    tracker: Arc<TaskTracker>,
}

impl Frontier {
    /// Creates a frontier whose set is pre-seeded with the sentinel entries
    /// (empty string and fragment-only `#`), which are thereby always
    /// rejected.
    pub fn new(
        scope: CrawlScope,
        fetch_tx: UnboundedSender<FetchTask>,
        tracker: Arc<TaskTracker>,
    ) -> Self {
        let mut seen = HashSet::new();
        seen.insert(String::new());
        seen.insert("#".to_string());

        Self {
            scope,
            seen: Mutex::new(seen),
            fetch_tx,
            tracker,
        }
    }

    /// Considers a candidate URL for crawling
    ///
    /// Root-relative candidates are rewritten to absolute form first. The
    /// candidate is rejected if it was ever admitted before (sentinels
    /// included) or if it falls outside the crawl scope. Otherwise it is
    /// marked as seen and a fetch task is enqueued, atomically with respect
    /// to concurrent callers: a URL is admitted at most once per run.
    ///
    /// Returns `Ok(true)` if a fetch task was enqueued. The only error is a
    /// closed fetch queue, which means the pipeline is torn down.
    pub fn admit(&self, referrer: &str, candidate: &str) -> Result<bool, SweepError> {
        let url = self.scope.resolve(candidate.trim());

        let mut seen = self.seen.lock().unwrap();

        if seen.contains(&url) {
            return Ok(false);
        }
        if !self.scope.in_scope(&url) {
            return Ok(false);
        }

        seen.insert(url.clone());

        self.tracker.fetch_submitted();
        self.fetch_tx
            .send(FetchTask {
                referrer: referrer.to_string(),
                url,
            })
            .map_err(|_| SweepError::Pipeline("fetch queue closed during admit".to_string()))?;

        Ok(true)
    }

    /// Number of URLs admitted so far, sentinels excluded
    pub fn admitted_count(&self) -> usize {
        self.seen.lock().unwrap().len() - 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn frontier() -> (Frontier, mpsc::UnboundedReceiver<FetchTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scope = CrawlScope::new("test.local", "https").unwrap();
        let frontier = Frontier::new(scope, tx, Arc::new(TaskTracker::new()));
        (frontier, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<FetchTask>) -> Vec<FetchTask> {
        let mut tasks = Vec::new();
        while let Ok(task) = rx.try_recv() {
            tasks.push(task);
        }
        tasks
    }

    #[test]
    fn test_admits_new_url() {
        let (frontier, mut rx) = frontier();
        let admitted = frontier
            .admit("https://test.local/", "https://test.local/a")
            .unwrap();
        assert!(admitted);

        let tasks = drain(&mut rx);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].url, "https://test.local/a");
        assert_eq!(tasks[0].referrer, "https://test.local/");
    }

    #[test]
    fn test_rejects_duplicate() {
        let (frontier, mut rx) = frontier();
        assert!(frontier.admit("", "https://test.local/a").unwrap());
        assert!(!frontier.admit("", "https://test.local/a").unwrap());
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_rejects_sentinels() {
        let (frontier, mut rx) = frontier();
        assert!(!frontier.admit("", "").unwrap());
        assert!(!frontier.admit("", "#").unwrap());
        assert!(!frontier.admit("", "   ").unwrap());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_rewrites_root_relative() {
        let (frontier, mut rx) = frontier();
        assert!(frontier.admit("https://test.local/", "/foo").unwrap());

        let tasks = drain(&mut rx);
        assert_eq!(tasks[0].url, "https://test.local/foo");
    }

    #[test]
    fn test_dedups_across_relative_and_absolute_forms() {
        let (frontier, mut rx) = frontier();
        assert!(frontier.admit("", "/foo").unwrap());
        assert!(!frontier.admit("", "https://test.local/foo").unwrap());
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_rejects_out_of_scope() {
        let (frontier, mut rx) = frontier();
        assert!(!frontier.admit("", "https://external.com/x").unwrap());
        assert!(!frontier.admit("", "javascript:void(0)").unwrap());
        assert!(!frontier.admit("", "mailto:a@test.local").unwrap());
        assert!(frontier.admit("", "http://test.local/plain").unwrap());
        assert_eq!(drain(&mut rx).len(), 1);
        assert_eq!(frontier.admitted_count(), 1);
    }

    #[test]
    fn test_tracks_queue_depth() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let scope = CrawlScope::new("test.local", "https").unwrap();
        let tracker = Arc::new(TaskTracker::new());
        let frontier = Frontier::new(scope, tx, tracker.clone());

        frontier.admit("", "https://test.local/a").unwrap();
        frontier.admit("", "https://test.local/b").unwrap();
        assert_eq!(tracker.fetch_queue_depth(), 2);
    }

    #[test]
    fn test_concurrent_discovery_admits_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scope = CrawlScope::new("test.local", "https").unwrap();
        let frontier = Arc::new(Frontier::new(scope, tx, Arc::new(TaskTracker::new())));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let frontier = frontier.clone();
                std::thread::spawn(move || frontier.admit("", "https://test.local/hot").unwrap())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&admitted| admitted)
            .count();

        assert_eq!(admitted, 1);
        assert_eq!(drain(&mut rx).len(), 1);
    }
}
