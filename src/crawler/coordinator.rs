//! Crawl coordination - session state, worker pools, and shutdown
//!
//! All mutable crawl state lives in a single [`CrawlSession`] that is passed
//! by reference into every worker task. Two dispatcher tasks drive the
//! bounded pools: each acquires a semaphore permit *before* dequeuing, then
//! spawns the task with the owned permit, so the configured concurrency
//! holds no matter how deep the backlog grows. The coordinator itself just
//! waits for the first of three events: quiescence, an interrupt, or a fatal
//! worker error.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_candidates;
use crate::crawler::tracker::TaskTracker;
use crate::crawler::{ExtractTask, FetchTask};
use crate::report::{write_report, CrawlResult, ResultStore};
use crate::scope::CrawlScope;
use crate::SweepError;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Shared state for one crawl run
///
/// Created once at startup, owned by an `Arc`, and never torn down until the
/// report has been written. Workers mutate it through interior mutability;
/// the report writer reads it once at the end.
pub struct CrawlSession {
    config: CrawlConfig,
    client: Client,
    frontier: Frontier,
    results: Mutex<ResultStore>,
    crawled: AtomicU64,
    tracker: Arc<TaskTracker>,
    extract_tx: UnboundedSender<ExtractTask>,
    fatal_tx: UnboundedSender<SweepError>,
}

impl CrawlSession {
    /// Hands a fetched page body to the extract pool
    fn submit_extract(&self, task: ExtractTask) -> Result<(), SweepError> {
        self.tracker.extract_submitted();
        self.extract_tx
            .send(task)
            .map_err(|_| SweepError::Pipeline("extract queue closed".to_string()))
    }

    /// Appends an error-status result to the store
    fn record(&self, result: CrawlResult) {
        self.results.lock().unwrap().record(result);
    }

    /// Bumps the completed-fetch counter and emits the progress line
    fn note_fetch_completed(&self) {
        let crawled = self.crawled.fetch_add(1, Ordering::SeqCst) + 1;
        let results = self.results.lock().unwrap();
        tracing::info!(
            "{} URLs crawled so far, {} to be crawled, 4xx: {}, 5xx: {}",
            crawled,
            self.tracker.fetch_queue_depth(),
            results.class_count("4xx"),
            results.class_count("5xx")
        );
    }

    /// Routes an unexpected failure to the coordinator
    ///
    /// The coordinator tears the run down without writing a report. If it is
    /// already gone the process is exiting anyway.
    fn abort(&self, error: SweepError) {
        let _ = self.fatal_tx.send(error);
    }
}

/// Processes one fetch task: GET, classify, hand off
async fn process_fetch(session: &CrawlSession, task: FetchTask) -> Result<(), SweepError> {
    match fetch_url(&session.client, &task.url).await? {
        FetchOutcome::Page { body } => {
            session.submit_extract(ExtractTask {
                url: task.url.clone(),
                referrer: task.referrer.clone(),
                content: body,
            })?;
        }

        FetchOutcome::ErrorStatus { status } => {
            session.record(CrawlResult {
                url: task.url.clone(),
                referrer: task.referrer.clone(),
                status,
            });
        }

        FetchOutcome::Transport { error } => {
            // No response at all: logged and dropped, never recorded, never
            // retried.
            tracing::warn!("Transport failure for {}: {}", task.url, error);
        }
    }

    session.note_fetch_completed();
    Ok(())
}

/// Processes one extract task: parse the page, offer every candidate
async fn process_extract(session: &CrawlSession, task: ExtractTask) -> Result<(), SweepError> {
    let candidates = extract_candidates(&task.content, &task.url)?;

    for candidate in candidates {
        session.frontier.admit(&task.url, &candidate)?;
    }

    Ok(())
}

fn spawn_fetch_pool(
    session: Arc<CrawlSession>,
    mut rx: UnboundedReceiver<FetchTask>,
) -> JoinHandle<()> {
    let limiter = Arc::new(Semaphore::new(session.config.fetch_concurrency));

    tokio::spawn(async move {
        loop {
            let permit = match limiter.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let task = match rx.recv().await {
                Some(task) => task,
                None => break,
            };

            session.tracker.fetch_started();
            let session = session.clone();
            tokio::spawn(async move {
                if let Err(e) = process_fetch(&session, task).await {
                    session.abort(e);
                }
                session.tracker.task_finished();
                drop(permit);
            });
        }
    })
}

fn spawn_extract_pool(
    session: Arc<CrawlSession>,
    mut rx: UnboundedReceiver<ExtractTask>,
) -> JoinHandle<()> {
    let limiter = Arc::new(Semaphore::new(session.config.extract_concurrency));

    tokio::spawn(async move {
        loop {
            let permit = match limiter.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let task = match rx.recv().await {
                Some(task) => task,
                None => break,
            };

            session.tracker.extract_started();
            let session = session.clone();
            tokio::spawn(async move {
                if let Err(e) = process_extract(&session, task).await {
                    session.abort(e);
                }
                session.tracker.task_finished();
                drop(permit);
            });
        }
    })
}

/// Runs a crawl to completion and writes the report
///
/// Seeds the frontier, then waits for the first of:
/// - quiescence (no task queued, running, or pending) - write the report;
/// - an interrupt - stop dequeuing, abandon in-flight work, write whatever
///   has been recorded so far;
/// - a fatal worker error - tear down with no report.
///
/// The first two return `Ok` so the process exits with a success code.
pub async fn run_crawl(config: CrawlConfig) -> Result<(), SweepError> {
    let scope = CrawlScope::new(&config.domain, &config.scheme)?;
    let seed = config.seed_url();
    let client = build_http_client().map_err(|e| SweepError::Http {
        url: seed.clone(),
        source: e,
    })?;

    let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
    let (extract_tx, extract_rx) = mpsc::unbounded_channel();
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();

    let tracker = Arc::new(TaskTracker::new());
    let frontier = Frontier::new(scope, fetch_tx, tracker.clone());

    let session = Arc::new(CrawlSession {
        config,
        client,
        frontier,
        results: Mutex::new(ResultStore::new()),
        crawled: AtomicU64::new(0),
        tracker: tracker.clone(),
        extract_tx,
        fatal_tx,
    });

    let fetch_pool = spawn_fetch_pool(session.clone(), fetch_rx);
    let extract_pool = spawn_extract_pool(session.clone(), extract_rx);

    tracing::info!("Starting crawl of {} from {}", session.config.domain, seed);
    session.frontier.admit("", &seed)?;

    let outcome = tokio::select! {
        _ = tracker.quiesced() => {
            tracing::info!(
                "Crawl exhausted after {} fetches, saving report",
                session.crawled.load(Ordering::SeqCst)
            );
            Ok(())
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    tracing::info!("Manual interruption, saving partial report");
                    Ok(())
                }
                Err(e) => Err(SweepError::Io(e)),
            }
        }
        Some(error) = fatal_rx.recv() => Err(error),
    };

    // Stop both dispatchers; in-flight tasks are abandoned, not awaited.
    fetch_pool.abort();
    extract_pool.abort();

    outcome?;

    let report_path = session.config.report_path();
    {
        let results = session.results.lock().unwrap();
        write_report(&results, &report_path)?;
        tracing::info!(
            "Report stored at {} ({} results)",
            report_path.display(),
            results.len()
        );
    }

    Ok(())
}
