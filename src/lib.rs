//! URL Fetcher Library
//!
//! A gRPC URL-fetching service that decouples clients from HTTP latency.
//! Clients stream URLs over `RequestFetch` and receive an opaque ticket
//! per URL; an internal pool of fetcher workers performs the HTTP GETs in
//! the background; presenting tickets over `ResolveFetch` returns the
//! completed responses, blocking only until each fetch finishes.
//!
//! # Architecture Overview
//!
//! - [`app`] - The fetch pipeline: ticket minter, fetch queue, worker
//!   pool, result table and the gRPC service tying them together
//! - [`client`] - gRPC client for talking to a running server
//! - [`server`] - tonic server plumbing with graceful shutdown
//! - [`pb`] - Generated protocol types
//! - [`errors`] - Error types and the crate [`Result`] alias
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use urlfetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Server side: start the pipeline and serve
//!     let service = UrlFetcherService::new(ServiceConfig::default())?;
//!     let addr = urlfetcher::server::resolve_listen_addr("localhost:8000").await?;
//!     tokio::spawn(urlfetcher::server::serve(
//!         service.clone(),
//!         addr,
//!         std::future::pending(),
//!     ));
//!
//!     // Client side: submit, then resolve
//!     let mut client = UrlFetcherClient::connect("localhost:8000").await?;
//!     let tickets = client
//!         .request_fetches(vec!["http://localhost:7000/echo/1".into()])
//!         .await?;
//!     let responses = client.resolve_fetches(&tickets).await?;
//!     assert_eq!(responses.len(), 1);
//!
//!     service.shutdown().await;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod app;
pub mod client;
pub mod constants;
pub mod errors;
pub mod pb;
pub mod server;

// Prelude module for convenient imports
pub mod prelude;

// CLI module - public for the binaries, not part of the service API
pub mod cli;

// Re-export the most commonly used types at the top level
pub use errors::{AppError, Result};

pub use app::{
    FetchClient, FetchClientConfig, FetchJob, FetchOutcome, FetchQueue, FetcherPool, ResultTable,
    ServiceConfig, ServiceStats, Ticket, TicketMinter, UrlFetcherService,
};

pub use client::{fetch_urls, UrlFetcherClient};

pub use constants::{DEFAULT_ADDRESS, DEFAULT_WORKER_COUNT};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "urlfetcher");
    }

    #[test]
    fn constants_accessible() {
        assert_eq!(DEFAULT_WORKER_COUNT, 16);
        assert_eq!(DEFAULT_ADDRESS, "localhost:8000");
    }

    #[test]
    fn public_api_accessible() {
        let _minter = TicketMinter::new();
        let _queue = FetchQueue::new();
        let _table = ResultTable::new();
        let _config = ServiceConfig::default();
    }
}
