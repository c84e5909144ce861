use async_trait::async_trait;

use crate::error::TransportError;

/// A single POST of a batch body to the collector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryRequest {
    pub url: String,
    pub body: String,
}

impl DeliveryRequest {
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        DeliveryRequest {
            url: url.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeliveryResponse {
    pub status: u16,
}

/// Capability used to reach the log collector.
///
/// Implementations must only return once the outcome of the request is known.
/// The returned future may be abandoned if a request deadline is configured.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, TransportError>;
}

/// Returns true iff the collector acknowledged the batch.
///
/// Any status in `[200, 400)` counts, redirects included.
pub fn is_delivered(outcome: &Result<DeliveryResponse, TransportError>) -> bool {
    match outcome {
        Ok(response) => (200..400).contains(&response.status),
        Err(_) => false,
    }
}
