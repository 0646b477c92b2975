//! Data types shared across the fetch pipeline

use crate::app::ticket::Ticket;
use crate::constants::transport;
use crate::pb;

/// A unit of work on the fetch queue: one ticket, one URL.
///
/// The URL is carried exactly as the client submitted it; the service does
/// no normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub ticket: Ticket,
    pub url: String,
}

impl FetchJob {
    pub fn new(ticket: Ticket, url: impl Into<String>) -> Self {
        Self {
            ticket,
            url: url.into(),
        }
    }
}

/// The completed result of one fetch.
///
/// Invariant: a non-zero `error_code` implies empty `header` and `body`.
/// HTTP status codes are not errors; a 404 arrives here with
/// `error_code == 0` and the status line inside `header`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub header: Vec<u8>,
    pub body: Vec<u8>,
    pub error_code: i32,
}

impl FetchOutcome {
    pub fn success(header: Vec<u8>, body: Vec<u8>) -> Self {
        Self {
            header,
            body,
            error_code: transport::OK,
        }
    }

    pub fn failure(error_code: i32) -> Self {
        Self {
            header: Vec::new(),
            body: Vec::new(),
            error_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_code == transport::OK
    }
}

impl From<FetchOutcome> for pb::Response {
    fn from(outcome: FetchOutcome) -> Self {
        Self {
            header: outcome.header,
            body: outcome.body,
            curl_error: outcome.error_code,
        }
    }
}

impl From<pb::Response> for FetchOutcome {
    fn from(response: pb::Response) -> Self {
        Self {
            header: response.header,
            body: response.body,
            error_code: response.curl_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_outcomes_are_empty() {
        let outcome = FetchOutcome::failure(transport::TIMED_OUT);
        assert!(!outcome.is_success());
        assert!(outcome.header.is_empty());
        assert!(outcome.body.is_empty());
    }

    #[test]
    fn outcome_round_trips_through_the_wire_type() {
        let outcome = FetchOutcome::success(b"HTTP/1.1 200 OK\r\n\r\n".to_vec(), b"hi".to_vec());
        let wire: pb::Response = outcome.clone().into();
        assert_eq!(wire.curl_error, 0);
        assert_eq!(FetchOutcome::from(wire), outcome);
    }
}
