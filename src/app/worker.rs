//! Fetcher worker pool
//!
//! A fixed set of workers drains the fetch queue, performs the HTTP GETs
//! and publishes results into the result table. Workers observe shutdown
//! through a shared running flag, re-checked after every timed dequeue, so
//! the pool stops within one dequeue interval once the flag clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::client::FetchClient;
use crate::app::queue::FetchQueue;
use crate::app::results::ResultTable;
use crate::constants::workers;

/// One fetcher worker.
///
/// In-flight fetches complete (or time out via the HTTP client) before the
/// worker exits; only queued, unstarted jobs can be abandoned at shutdown.
struct FetchWorker {
    id: u32,
    queue: Arc<FetchQueue>,
    table: Arc<ResultTable>,
    client: Arc<FetchClient>,
    running: Arc<AtomicBool>,
    dequeue_wait: Duration,
}

impl FetchWorker {
    async fn run(self) {
        debug!("fetcher {} started", self.id);
        while self.running.load(Ordering::Acquire) {
            let Some(job) = self.queue.dequeue_timeout(self.dequeue_wait).await else {
                continue;
            };
            debug!(
                "fetcher {} handling ticket {} url '{}'",
                self.id, job.ticket, job.url
            );
            let outcome = self.client.fetch(&job.url).await;
            self.table.publish(job.ticket, outcome);
        }
        debug!("fetcher {} stopped", self.id);
    }
}

/// Fixed-size pool of fetcher workers.
#[derive(Debug)]
pub struct FetcherPool {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl FetcherPool {
    /// Spawn `worker_count` workers. Must be called within a tokio runtime.
    pub fn start(
        worker_count: usize,
        dequeue_wait: Duration,
        queue: Arc<FetchQueue>,
        table: Arc<ResultTable>,
        client: Arc<FetchClient>,
    ) -> Self {
        info!("starting {} fetcher workers", worker_count);
        let running = Arc::new(AtomicBool::new(true));
        let handles = (0..worker_count)
            .map(|id| {
                let worker = FetchWorker {
                    id: id as u32,
                    queue: Arc::clone(&queue),
                    table: Arc::clone(&table),
                    client: Arc::clone(&client),
                    running: Arc::clone(&running),
                    dequeue_wait,
                };
                tokio::spawn(worker.run())
            })
            .collect();
        Self { running, handles }
    }

    /// Spawn workers with the default dequeue interval.
    pub fn with_defaults(
        worker_count: usize,
        queue: Arc<FetchQueue>,
        table: Arc<ResultTable>,
        client: Arc<FetchClient>,
    ) -> Self {
        Self::start(worker_count, workers::DEQUEUE_WAIT, queue, table, client)
    }

    /// Number of workers the pool was started with.
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Clear the running flag and join every worker.
    pub async fn shutdown(self) {
        info!("stopping {} fetcher workers", self.handles.len());
        self.running.store(false, Ordering::Release);
        for (id, handle) in self.handles.into_iter().enumerate() {
            if let Err(err) = handle.await {
                warn!("fetcher {} terminated abnormally: {}", id, err);
            }
        }
        info!("fetcher pool stopped");
    }
}
