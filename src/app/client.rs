//! HTTP fetch client
//!
//! Thin wrapper over [`reqwest`] implementing the collaborator contract of
//! the fetch pipeline: `fetch(url)` performs a GET, follows redirects,
//! enforces the total timeout, and always yields a value-typed
//! [`FetchOutcome`]. Transport failures become non-zero error codes rather
//! than `Err` values; HTTP status codes are never interpreted here.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{redirect, StatusCode, Version};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::app::models::FetchOutcome;
use crate::constants::{http, transport};

/// Configuration for the fetch client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchClientConfig {
    /// Total per-request timeout, covering connect, redirects and body
    pub timeout: Duration,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchClientConfig {
    fn default() -> Self {
        Self {
            timeout: http::FETCH_TIMEOUT,
            max_redirects: http::MAX_REDIRECTS,
        }
    }
}

/// HTTP client shared by all fetcher workers.
#[derive(Debug)]
pub struct FetchClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl FetchClient {
    /// Build the underlying HTTP client.
    ///
    /// Construction failure is a startup error; there is no per-fetch
    /// initialization that could fail silently later.
    pub fn new(config: FetchClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .user_agent(http::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Perform a GET on `url` and capture header, body and transport error
    /// code. Never returns an `Err`: failures are data for the client.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("performing GET on '{}' with timeout {:?}", url, self.timeout);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("GET on '{}' failed: {}", url, err);
                return FetchOutcome::failure(error_code_for(&err));
            }
        };

        // Header bytes reflect the final response after redirects
        let header = format_header(response.version(), response.status(), response.headers());
        match response.bytes().await {
            Ok(body) => {
                debug!("GET successful on '{}', {} body bytes", url, body.len());
                FetchOutcome::success(header, body.to_vec())
            }
            Err(err) => {
                error!("reading body of '{}' failed: {}", url, err);
                FetchOutcome::failure(error_code_for(&err))
            }
        }
    }
}

/// Reconstruct a raw header block: status line, then one `name: value`
/// line per header, then a blank line.
fn format_header(version: Version, status: StatusCode, headers: &HeaderMap) -> Vec<u8> {
    let mut header = format!("{version:?} {status}\r\n").into_bytes();
    for (name, value) in headers {
        header.extend_from_slice(name.as_str().as_bytes());
        header.extend_from_slice(b": ");
        header.extend_from_slice(value.as_bytes());
        header.extend_from_slice(b"\r\n");
    }
    header.extend_from_slice(b"\r\n");
    header
}

fn error_code_for(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        transport::TIMED_OUT
    } else if err.is_redirect() {
        transport::TOO_MANY_REDIRECTS
    } else if err.is_connect() {
        transport::COULDNT_CONNECT
    } else if err.is_builder() || err.is_request() {
        transport::URL_MALFORMAT
    } else if err.is_body() || err.is_decode() {
        transport::RECV_ERROR
    } else {
        transport::UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response, then stop.
    async fn one_shot_http_server(reply: &'static str) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut discard = [0u8; 4096];
            let _ = socket.read(&mut discard).await;
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn fetch_captures_header_and_body() {
        let addr = one_shot_http_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        )
        .await;
        let client = FetchClient::new(FetchClientConfig::default()).unwrap();

        let outcome = client.fetch(&format!("http://{addr}/anything")).await;
        assert!(outcome.is_success());
        assert!(outcome.header.starts_with(b"HTTP/1.1 200"));
        assert_eq!(outcome.body, b"hello");
    }

    #[tokio::test]
    async fn http_error_statuses_are_successful_fetches() {
        let addr = one_shot_http_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = FetchClient::new(FetchClientConfig::default()).unwrap();

        let outcome = client.fetch(&format!("http://{addr}/missing")).await;
        assert!(outcome.is_success());
        assert!(outcome.header.starts_with(b"HTTP/1.1 404"));
    }

    #[tokio::test]
    async fn malformed_urls_map_to_a_transport_error() {
        let client = FetchClient::new(FetchClientConfig::default()).unwrap();
        let outcome = client.fetch("not a url").await;
        assert_eq!(outcome.error_code, transport::URL_MALFORMAT);
        assert!(outcome.header.is_empty());
        assert!(outcome.body.is_empty());
    }

    #[tokio::test]
    async fn refused_connections_fail_with_a_nonzero_code() {
        let client = FetchClient::new(FetchClientConfig::default()).unwrap();
        // Nothing listens on the port once the listener is dropped
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let outcome = client.fetch(&format!("http://{addr}/")).await;
        assert_ne!(outcome.error_code, transport::OK);
        assert!(outcome.header.is_empty());
        assert!(outcome.body.is_empty());
    }

    #[test]
    fn header_block_is_status_line_headers_blank_line() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "text/plain".parse().unwrap());
        let header = format_header(Version::HTTP_11, StatusCode::OK, &headers);
        assert_eq!(
            header,
            b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\n".to_vec()
        );
    }
}
