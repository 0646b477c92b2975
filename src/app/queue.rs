//! Fetch queue feeding the worker pool
//!
//! A multi-producer / multi-consumer FIFO of [`FetchJob`]s. `RequestFetch`
//! handlers enqueue without ever blocking; workers dequeue with a timeout
//! so they can observe the shutdown flag between attempts.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;

use crate::app::models::FetchJob;

/// Unbounded FIFO of pending fetch jobs.
///
/// State is a mutex-guarded deque; the lock is held only for push/pop.
/// A [`Notify`] wakes one blocked consumer per enqueue. Consumers always
/// re-check the deque before sleeping, so a permit stored while nobody
/// was waiting is never lost.
#[derive(Debug, Default)]
pub struct FetchQueue {
    jobs: Mutex<VecDeque<FetchJob>>,
    available: Notify,
}

impl FetchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job to the back of the queue. Never blocks, never fails.
    pub fn enqueue(&self, job: FetchJob) {
        self.jobs().push_back(job);
        self.available.notify_one();
    }

    /// Remove the oldest job, waiting up to `wait` for one to appear.
    ///
    /// Returns `None` on timeout. Safe for any number of concurrent
    /// consumers; each job is handed to exactly one of them.
    pub async fn dequeue_timeout(&self, wait: Duration) -> Option<FetchJob> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let notified = self.available.notified();
            if let Some(job) = self.jobs().pop_front() {
                return Some(job);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }

    /// Number of jobs currently queued.
    pub fn len(&self) -> usize {
        self.jobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs().is_empty()
    }

    fn jobs(&self) -> std::sync::MutexGuard<'_, VecDeque<FetchJob>> {
        self.jobs.lock().expect("fetch queue lock poisoned")
    }
}
