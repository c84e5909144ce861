//! This library defines a client-side log shipper.
//!
//! Application code appends structured log records to a [`Logger`].
//! The logger buffers them in memory, and ships them periodically to a
//! remote HTTP log collector as newline separated JSON objects:
//!
//! ```text
//! {"level":"INFO","data":"log line"}
//! {"level":"WARN","data":{"some":"values"}}
//! ```
//!
//! Every period, if no request is outstanding, at most `max_batch_len`
//! records from the head of the buffer are posted. They are removed from
//! the buffer only once the collector replies with a status in
//! `[200, 400)`. Any other outcome leaves the buffer untouched, and the
//! same records are sent again on the next tick. There is no other retry
//! mechanism, and no backoff.
//!
//! Records are delivered at least once, in append order. The buffer is
//! not persisted and not bounded.
//!
//! # Usage
//!
//! ```no_run
//! use serde::Serialize;
//! use shiplog::{Logger, LoggerConfig};
//!
//! #[derive(Serialize)]
//! struct Checkout<'a> {
//!     user: &'a str,
//!     total_cents: u64,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), shiplog::TransportError> {
//! let logger = Logger::new("FAKE-COLLECTOR-CODE", LoggerConfig::default())?;
//! logger.info("starting");
//! logger.warn(&Checkout {
//!     user: "droopy",
//!     total_cents: 1_250,
//! });
//! # Ok(())
//! # }
//! ```

mod config;
pub mod console;
mod delivery;
mod error;
mod logger;
mod mem;
mod position;
mod record;

pub use self::config::{LoggerConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_BATCH_LEN, DEFAULT_SYNC_INTERVAL};
pub use self::delivery::{
    is_delivered, Batch, DeliveryRequest, DeliveryResponse, DeliveryState, HttpTransport, Transport,
};
pub use self::error::TransportError;
pub use self::logger::Logger;
pub use self::mem::RecordQueue;
pub use self::position::Position;
pub use self::record::{
    serialize, serialize_display, serialize_list, Level, LogRecord, SERIALIZATION_FALLBACK,
};

mod scheduler;

#[cfg(test)]
mod test_support;
