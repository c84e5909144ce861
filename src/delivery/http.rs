use async_trait::async_trait;
use reqwest::redirect::Policy;

use crate::delivery::{DeliveryRequest, DeliveryResponse, Transport};
use crate::error::TransportError;

/// `Transport` posting batches over HTTP(S).
///
/// Redirects are not followed: a 3xx reply is reported as is,
/// and counts as an acknowledgement.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(HttpTransport { client })
    }

    /// Uses a preconfigured client, e.g. one with a proxy or custom root certificates.
    ///
    /// The client keeps its own redirect policy.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .body(request.body)
            .send()
            .await?;
        Ok(DeliveryResponse {
            status: response.status().as_u16(),
        })
    }
}
