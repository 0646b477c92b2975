//! Error types for the URL fetcher
//!
//! Transport failures during a fetch are data, not errors: they travel to
//! the client inside `Response.curl_error`. The enums here cover everything
//! else, from result-table lifecycle to gRPC plumbing.

use thiserror::Error;

use crate::app::Ticket;

/// Result table errors surfaced to `ResolveFetch` handlers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The table was closed (service shutting down) while a waiter was
    /// still blocked on an absent ticket
    #[error("result table closed while waiting for a fetch result")]
    Closed,

    /// A second stream tried to resolve a ticket that already has an
    /// active waiter. Resolving the same ticket twice is a client bug;
    /// failing fast beats blocking forever.
    #[error("ticket {ticket} is already being resolved by another stream")]
    DuplicateTake { ticket: Ticket },
}

/// Errors constructing the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The underlying HTTP client could not be built
    #[error("failed to build the HTTP fetch client")]
    HttpClient(#[from] reqwest::Error),
}

/// Server startup and serving errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listen address did not resolve to any socket address
    #[error("listen address '{address}' did not resolve")]
    InvalidAddress { address: String },

    /// Resolving the listen address failed
    #[error("failed to resolve listen address")]
    AddressLookup(#[from] std::io::Error),

    /// The gRPC transport failed to bind or serve
    #[error("gRPC transport failure")]
    Transport(#[from] tonic::transport::Error),
}

/// gRPC client-side errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Could not establish a channel to the server
    #[error("failed to connect to the URL fetcher server")]
    Connect(#[source] tonic::transport::Error),

    /// An RPC stream terminated with a non-OK status
    #[error("RPC stream failed: {0}")]
    Rpc(#[from] tonic::Status),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Table(_) => "results",
            AppError::Service(_) => "service",
            AppError::Server(_) => "server",
            AppError::Client(_) => "client",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
