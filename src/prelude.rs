//! Prelude module for the URL fetcher library
//!
//! Re-exports the items needed for typical usage with a single
//! `use urlfetcher::prelude::*;` statement.

pub use crate::errors::{AppError, Result};

pub use crate::app::{
    FetchJob, FetchOutcome, ServiceConfig, ServiceStats, Ticket, UrlFetcherService,
};

pub use crate::client::{fetch_urls, UrlFetcherClient};

pub use crate::constants::{DEFAULT_ADDRESS, DEFAULT_WORKER_COUNT};

pub use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_imports() {
        let _config = ServiceConfig::default();
        assert_eq!(DEFAULT_WORKER_COUNT, 16);

        let data = Arc::new(1u64);
        assert_eq!(*data, 1);
    }
}
