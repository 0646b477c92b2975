//! Core fetch pipeline for the URL fetcher
//!
//! This module contains the service internals: ticket minting, the fetch
//! queue, the worker pool, the result table and the gRPC service that ties
//! them together.
//!
//! Data flows in one direction: a `RequestFetch` handler mints a ticket,
//! echoes it to the client and enqueues the job; a fetcher worker dequeues
//! it, performs the GET and publishes the outcome; a `ResolveFetch`
//! handler takes the outcome and streams it back.

pub mod client;
pub mod models;
pub mod queue;
pub mod results;
pub mod service;
pub mod ticket;
pub mod worker;

// Re-export main public API
pub use client::{FetchClient, FetchClientConfig};
pub use models::{FetchJob, FetchOutcome};
pub use queue::FetchQueue;
pub use results::ResultTable;
pub use service::{ServiceConfig, ServiceStats, UrlFetcherService};
pub use ticket::{Ticket, TicketMinter};
pub use worker::FetcherPool;
