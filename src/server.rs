//! gRPC server plumbing
//!
//! Builds the tonic server around a [`UrlFetcherService`] and runs it with
//! graceful shutdown. Signal handling stays in the binary; this module
//! only consumes a ready-made shutdown future, which makes the same entry
//! points usable from the integration tests on ephemeral ports.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use crate::app::UrlFetcherService;
use crate::errors::ServerError;
use crate::pb::url_fetcher_server::UrlFetcherServer;

/// Resolve a `host:port` string (e.g. `localhost:8000`) to a socket
/// address. Fails if the host does not resolve at all.
pub async fn resolve_listen_addr(address: &str) -> Result<SocketAddr, ServerError> {
    tokio::net::lookup_host(address)
        .await?
        .next()
        .ok_or_else(|| ServerError::InvalidAddress {
            address: address.to_string(),
        })
}

/// Serve on `addr` until `shutdown` completes, then finish in-flight
/// streams and return. Binding failures surface as [`ServerError`].
pub async fn serve<F>(
    service: UrlFetcherService,
    addr: SocketAddr,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    info!("server listening on {}", addr);
    Server::builder()
        .add_service(UrlFetcherServer::new(service))
        .serve_with_shutdown(addr, shutdown)
        .await?;
    Ok(())
}

/// Serve on an already-bound listener. Used by tests that need an
/// ephemeral port known before the server starts.
pub async fn serve_with_listener<F>(
    service: UrlFetcherService,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    if let Ok(addr) = listener.local_addr() {
        info!("server listening on {}", addr);
    }
    Server::builder()
        .add_service(UrlFetcherServer::new(service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listen_addresses_resolve() {
        let addr = resolve_listen_addr("localhost:8000").await.unwrap();
        assert_eq!(addr.port(), 8000);

        assert!(resolve_listen_addr("definitely-not-a-host.invalid:1")
            .await
            .is_err());
    }
}
