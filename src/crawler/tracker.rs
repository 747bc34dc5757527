//! Crawl termination detection
//!
//! Neither pool ever says "done" — exhaustion has to be inferred. Instead of
//! polling queue depths on a timer and double-checking after a delay, the
//! tracker counts outstanding work: every task submitted to either pool
//! increments the counter, every finished task decrements it. Workers submit
//! follow-up work *before* decrementing their own task, so the counter can
//! only reach zero when no task is queued, running, or about to be created.
//! The zero crossing is the quiescence signal; it fires exactly once per
//! crawl and does not depend on a poll interval.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Shared counters tracking work owned by the two pools
#[derive(Debug, Default)]
pub struct TaskTracker {
    /// Tasks submitted to either pool and not yet finished
    outstanding: AtomicUsize,

    /// Fetch tasks waiting in the queue (not yet handed to a worker)
    fetch_queued: AtomicUsize,

    /// Extract tasks waiting in the queue
    extract_queued: AtomicUsize,

    idle: Notify,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetch task entered the queue
    pub fn fetch_submitted(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.fetch_queued.fetch_add(1, Ordering::SeqCst);
    }

    /// A fetch task left the queue for a worker slot
    pub fn fetch_started(&self) {
        self.fetch_queued.fetch_sub(1, Ordering::SeqCst);
    }

    /// An extract task entered the queue
    pub fn extract_submitted(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.extract_queued.fetch_add(1, Ordering::SeqCst);
    }

    /// An extract task left the queue for a worker slot
    pub fn extract_started(&self) {
        self.extract_queued.fetch_sub(1, Ordering::SeqCst);
    }

    /// A task from either pool finished
    ///
    /// Must be called after any follow-up submissions the task made, never
    /// before; the quiescence signal relies on that ordering.
    pub fn task_finished(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Fetch tasks currently waiting in the queue
    pub fn fetch_queue_depth(&self) -> usize {
        self.fetch_queued.load(Ordering::SeqCst)
    }

    /// Extract tasks currently waiting in the queue
    pub fn extract_queue_depth(&self) -> usize {
        self.extract_queued.load(Ordering::SeqCst)
    }

    /// Resolves once no task is queued, running, or pending creation
    ///
    /// Callers must submit the seed task before awaiting, otherwise the
    /// tracker is trivially idle.
    pub async fn quiesced(&self) {
        loop {
            let notified = self.idle.notified();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}
