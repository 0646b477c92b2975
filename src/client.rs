//! gRPC client for the URL fetcher service
//!
//! Mirrors the two-phase protocol: `request_fetches` streams URLs and
//! collects the tickets, `resolve_fetches` streams tickets and collects
//! the responses. [`fetch_urls`] chains both for the common case.

use tokio_stream::iter;
use tonic::transport::Channel;
use tracing::{debug, info};

use crate::app::Ticket;
use crate::errors::ClientError;
use crate::pb;
use crate::pb::url_fetcher_client;

/// Client handle over a single gRPC channel.
#[derive(Debug, Clone)]
pub struct UrlFetcherClient {
    inner: url_fetcher_client::UrlFetcherClient<Channel>,
}

impl UrlFetcherClient {
    /// Connect to a server. A bare `host:port` is accepted and treated as
    /// plain-text HTTP, matching the server side.
    pub async fn connect(address: &str) -> Result<Self, ClientError> {
        let endpoint = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        let inner = url_fetcher_client::UrlFetcherClient::connect(endpoint)
            .await
            .map_err(ClientError::Connect)?;
        Ok(Self { inner })
    }

    /// Submit URLs and return one ticket per URL, in submission order.
    pub async fn request_fetches(&mut self, urls: Vec<String>) -> Result<Vec<Ticket>, ClientError> {
        info!("requesting {} URLs from server", urls.len());
        let outbound = iter(urls.into_iter().map(|url| pb::Request { url }));
        let mut inbound = self.inner.request_fetch(outbound).await?.into_inner();

        let mut tickets = Vec::new();
        while let Some(pending) = inbound.message().await? {
            debug!("received pending fetch with ticket {}", pending.key);
            tickets.push(pending.key);
        }
        Ok(tickets)
    }

    /// Present tickets and collect the corresponding responses, blocking
    /// server-side until each fetch completes.
    pub async fn resolve_fetches(
        &mut self,
        tickets: &[Ticket],
    ) -> Result<Vec<pb::Response>, ClientError> {
        info!("resolving {} pending fetches", tickets.len());
        let pending: Vec<pb::PendingFetch> = tickets
            .iter()
            .map(|&key| pb::PendingFetch { key })
            .collect();
        let mut inbound = self.inner.resolve_fetch(iter(pending)).await?.into_inner();

        let mut responses = Vec::with_capacity(tickets.len());
        while let Some(response) = inbound.message().await? {
            debug!(
                "received response, header {} bytes, body {} bytes, error code {}",
                response.header.len(),
                response.body.len(),
                response.curl_error
            );
            responses.push(response);
        }
        Ok(responses)
    }
}

/// Request and resolve in one call, returning responses positionally
/// matched to `urls`.
pub async fn fetch_urls(urls: Vec<String>, address: &str) -> Result<Vec<pb::Response>, ClientError> {
    let mut client = UrlFetcherClient::connect(address).await?;
    let tickets = client.request_fetches(urls).await?;
    client.resolve_fetches(&tickets).await
}
