use std::time::Duration;

use thiserror::Error;

/// Reasons a delivery attempt may fail before the collector replied.
///
/// A reply with an unexpected status is not a `TransportError`:
/// the transport reports the status, and the caller decides.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No reply after {0:?}")]
    Timeout(Duration),
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}
