//! Application constants for the URL fetcher
//!
//! This module centralizes the constants used throughout the service,
//! organized by functional domain.

use std::time::Duration;

/// gRPC server defaults
pub mod server {
    /// Default serving address, clients should connect to this
    pub const DEFAULT_ADDRESS: &str = "localhost:8000";
}

/// Worker pool and queue configuration
pub mod workers {
    use super::Duration;

    /// Default number of fetcher workers
    pub const DEFAULT_WORKER_COUNT: usize = 16;

    /// How long a worker blocks on an empty fetch queue before re-checking
    /// the running flag. Bounds shutdown latency to one interval.
    pub const DEQUEUE_WAIT: Duration = Duration::from_millis(200);
}

/// HTTP fetch client configuration
pub mod http {
    use super::Duration;

    /// Total per-request timeout, covering connect, redirects and body
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;

    /// User agent sent with every GET
    pub const USER_AGENT: &str = concat!("urlfetcher/", env!("CARGO_PKG_VERSION"));
}

/// RPC stream handling
pub mod rpc {
    /// Outbound message buffer per stream handler
    pub const STREAM_BUFFER: usize = 64;
}

/// Transport-level error codes reported in `Response.curl_error`
///
/// The namespace is opaque to clients; only zero versus non-zero is
/// contractual. Values mirror the well-known curl codes so operators
/// reading logs get familiar numbers.
pub mod transport {
    /// Transport succeeded (HTTP status codes are data, not errors)
    pub const OK: i32 = 0;

    /// Failure that maps to no more specific code
    pub const UNKNOWN: i32 = 1;

    /// The URL could not be parsed
    pub const URL_MALFORMAT: i32 = 3;

    /// DNS resolution or TCP/TLS connection failure
    pub const COULDNT_CONNECT: i32 = 7;

    /// The request exceeded the total fetch timeout
    pub const TIMED_OUT: i32 = 28;

    /// The redirect limit was exceeded
    pub const TOO_MANY_REDIRECTS: i32 = 47;

    /// The connection failed while reading the response body
    pub const RECV_ERROR: i32 = 56;
}

// Re-export commonly used constants for convenience
pub use http::{FETCH_TIMEOUT, USER_AGENT};
pub use server::DEFAULT_ADDRESS;
pub use workers::{DEFAULT_WORKER_COUNT, DEQUEUE_WAIT};
