//! The URL fetcher gRPC service
//!
//! Implements the two bidirectional streaming RPCs over the shared fetch
//! pipeline:
//!
//! - `RequestFetch`: per inbound URL, mint a ticket, echo it back on the
//!   outbound stream, enqueue the job. The handler never waits for the
//!   fetch itself.
//! - `ResolveFetch`: per inbound ticket, block until the result is
//!   published, then stream it back.
//!
//! The service handle is cheap to clone; one copy goes to the tonic
//! server while the binary keeps another to drive [`shutdown`] from its
//! signal handler.
//!
//! [`shutdown`]: UrlFetcherService::shutdown

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info};

use crate::app::client::{FetchClient, FetchClientConfig};
use crate::app::models::FetchJob;
use crate::app::queue::FetchQueue;
use crate::app::results::ResultTable;
use crate::app::ticket::TicketMinter;
use crate::app::worker::FetcherPool;
use crate::constants::{rpc, workers};
use crate::errors::{ServiceError, TableError};
use crate::pb;
use crate::pb::url_fetcher_server::UrlFetcher;

/// Configuration for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Number of fetcher workers
    pub worker_count: usize,
    /// How long workers block on an empty queue before re-checking the
    /// running flag
    pub dequeue_wait: Duration,
    /// HTTP fetch client settings
    pub fetch: FetchClientConfig,
    /// Outbound message buffer per stream handler
    pub stream_buffer: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            dequeue_wait: workers::DEQUEUE_WAIT,
            fetch: FetchClientConfig::default(),
            stream_buffer: rpc::STREAM_BUFFER,
        }
    }
}

/// Point-in-time service counters, mainly for logging and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Highest ticket minted so far (0 if none)
    pub tickets_minted: u64,
    /// Jobs waiting on the fetch queue
    pub jobs_queued: usize,
    /// Results published but not yet resolved
    pub results_ready: usize,
}

#[derive(Debug)]
struct ServiceInner {
    minter: TicketMinter,
    queue: Arc<FetchQueue>,
    table: Arc<ResultTable>,
    pool: tokio::sync::Mutex<Option<FetcherPool>>,
    stream_buffer: usize,
}

/// The URL fetching service.
///
/// Owns the ticket minter, fetch queue, result table and worker pool for
/// its whole lifetime. Constructing the service starts the workers;
/// [`shutdown`](Self::shutdown) stops them and releases any blocked
/// resolvers.
#[derive(Debug, Clone)]
pub struct UrlFetcherService {
    inner: Arc<ServiceInner>,
}

impl UrlFetcherService {
    /// Build the HTTP client and start the worker pool.
    ///
    /// Must be called within a tokio runtime. Fails only if the HTTP
    /// client cannot be constructed.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Arc::new(FetchClient::new(config.fetch)?);
        let queue = Arc::new(FetchQueue::new());
        let table = Arc::new(ResultTable::new());
        let pool = FetcherPool::start(
            config.worker_count,
            config.dequeue_wait,
            Arc::clone(&queue),
            Arc::clone(&table),
            client,
        );

        Ok(Self {
            inner: Arc::new(ServiceInner {
                minter: TicketMinter::new(),
                queue,
                table,
                pool: tokio::sync::Mutex::new(Some(pool)),
                stream_buffer: config.stream_buffer,
            }),
        })
    }

    /// Current pipeline counters.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            tickets_minted: self.inner.minter.last(),
            jobs_queued: self.inner.queue.len(),
            results_ready: self.inner.table.ready_len(),
        }
    }

    /// Stop the service: clear the running flag, join every worker, then
    /// close the result table so blocked `ResolveFetch` handlers return.
    ///
    /// Jobs still queued when the pool stops are dropped. Idempotent;
    /// repeated calls are no-ops.
    pub async fn shutdown(&self) {
        let pool = self.inner.pool.lock().await.take();
        let Some(pool) = pool else {
            debug!("service shutdown already performed");
            return;
        };

        info!("shutting down URL fetcher service");
        pool.shutdown().await;

        let abandoned = self.inner.queue.len();
        if abandoned > 0 {
            info!("dropping {} fetch jobs still queued at shutdown", abandoned);
        }
        self.inner.table.close();
    }
}

#[tonic::async_trait]
impl UrlFetcher for UrlFetcherService {
    type RequestFetchStream = ReceiverStream<Result<pb::PendingFetch, Status>>;

    async fn request_fetch(
        &self,
        request: Request<Streaming<pb::Request>>,
    ) -> Result<Response<Self::RequestFetchStream>, Status> {
        info!("reading URL fetch requests from stream");
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(self.inner.stream_buffer);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            loop {
                match inbound.message().await {
                    Ok(Some(request)) => {
                        debug!("got URL '{}'", request.url);
                        let ticket = inner.minter.mint();
                        // Echo the ticket before enqueueing; reads are
                        // serial, so tickets on one stream are strictly
                        // increasing
                        if tx.send(Ok(pb::PendingFetch { key: ticket })).await.is_err() {
                            debug!("ticket stream receiver dropped, stopping reads");
                            break;
                        }
                        inner.queue.enqueue(FetchJob::new(ticket, request.url));
                    }
                    Ok(None) => break,
                    Err(status) => {
                        debug!("request stream aborted: {}", status);
                        break;
                    }
                }
            }
            info!("RequestFetch finished");
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    type ResolveFetchStream = ReceiverStream<Result<pb::Response, Status>>;

    async fn resolve_fetch(
        &self,
        request: Request<Streaming<pb::PendingFetch>>,
    ) -> Result<Response<Self::ResolveFetchStream>, Status> {
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(self.inner.stream_buffer);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            loop {
                match inbound.message().await {
                    Ok(Some(pending)) => {
                        info!("resolving pending fetch {}", pending.key);
                        match inner.table.take(pending.key).await {
                            Ok(outcome) => {
                                if tx.send(Ok(outcome.into())).await.is_err() {
                                    debug!("response stream receiver dropped, stopping reads");
                                    break;
                                }
                            }
                            Err(TableError::Closed) => {
                                let _ = tx
                                    .send(Err(Status::unavailable(
                                        "service is shutting down, fetch result unavailable",
                                    )))
                                    .await;
                                break;
                            }
                            Err(err @ TableError::DuplicateTake { .. }) => {
                                let _ = tx
                                    .send(Err(Status::failed_precondition(err.to_string())))
                                    .await;
                                break;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(status) => {
                        debug!("resolve stream aborted: {}", status);
                        break;
                    }
                }
            }
            info!("ResolveFetch finished");
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_is_idempotent() {
        let service = UrlFetcherService::new(ServiceConfig {
            worker_count: 2,
            dequeue_wait: Duration::from_millis(20),
            ..Default::default()
        })
        .unwrap();

        service.shutdown().await;
        service.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stats_track_the_pipeline() {
        let service = UrlFetcherService::new(ServiceConfig {
            worker_count: 1,
            dequeue_wait: Duration::from_millis(20),
            ..Default::default()
        })
        .unwrap();

        let stats = service.stats();
        assert_eq!(stats.tickets_minted, 0);
        assert_eq!(stats.jobs_queued, 0);
        assert_eq!(stats.results_ready, 0);

        service.shutdown().await;
    }
}
