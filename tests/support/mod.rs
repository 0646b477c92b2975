//! Shared fixtures for the end-to-end tests
//!
//! Everything runs in-process on ephemeral ports: a minimal HTTP echo
//! server standing in for the outside world, and a full URL fetcher
//! server wired through the real tonic transport.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use urlfetcher::app::{ServiceConfig, UrlFetcherService};
use urlfetcher::client::UrlFetcherClient;
use urlfetcher::errors::ServerError;
use urlfetcher::server;

/// Minimal HTTP server for tests.
///
/// Routes:
/// - `/echo/<x>`     → 200 with `<x>` (the last path segment) as the body
/// - `/error/<code>` → status `<code>` with an empty body
/// - `/redirect/<x>` → 302 to `/echo/<x>`
pub struct EchoServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl EchoServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(handle_connection(socket));
            }
        });
        Self { addr, handle }
    }

    /// URL for `/echo/<value>` on this server.
    pub fn echo_url(&self, value: impl std::fmt::Display) -> String {
        format!("http://{}/echo/{}", self.addr, value)
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

async fn handle_connection(mut socket: TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => return,
            Ok(n) => {
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => return,
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let reply = respond_to(path);
    let _ = socket.write_all(reply.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn respond_to(path: &str) -> String {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["echo", ..] => {
            let body = segments.last().copied().unwrap_or("");
            format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        }
        ["error", code] => format!(
            "HTTP/1.1 {code} Echoed Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        ),
        ["redirect", value] => format!(
            "HTTP/1.1 302 Found\r\nLocation: /echo/{value}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        ),
        _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    }
}

/// A URL fetcher server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub service: UrlFetcherService,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn start(worker_count: usize) -> Self {
        let config = ServiceConfig {
            worker_count,
            dequeue_wait: Duration::from_millis(50),
            ..Default::default()
        };
        let service = UrlFetcherService::new(config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(server::serve_with_listener(
            service.clone(),
            listener,
            async move {
                let _ = shutdown_rx.await;
            },
        ));

        Self {
            addr,
            service,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub async fn connect(&self) -> UrlFetcherClient {
        let address = self.addr.to_string();
        for _ in 0..20 {
            match UrlFetcherClient::connect(&address).await {
                Ok(client) => return client,
                Err(_) => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
        panic!("could not connect to test server at {address}");
    }

    /// Full shutdown: service first (drains blocked resolvers), then the
    /// transport.
    pub async fn stop(mut self) {
        self.service.shutdown().await;
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}
