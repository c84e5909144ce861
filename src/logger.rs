// Copyright (C) 2022 Quickwit, Inc.
//
// Quickwit is offered under the AGPL v3.0 and as commercial software.
// For commercial licensing, contact us at hello@quickwit.io.
//
// AGPL:
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::LoggerConfig;
use crate::delivery::{DeliveryState, Flusher, HttpTransport, Transport};
use crate::error::TransportError;
use crate::record::{serialize, Level, LogRecord};
use crate::scheduler::FlushScheduler;

/// Buffers log records and ships them to a remote collector in the background.
///
/// Appending never blocks on the network and never fails. Records are sent
/// in append order, at most one request at a time, and are only dropped from
/// the buffer once the collector acknowledged them.
///
/// Records still buffered when the logger is dropped are lost.
pub struct Logger {
    state: Arc<Mutex<DeliveryState>>,
    collector_url: String,
    _flush_scheduler: FlushScheduler,
}

impl Logger {
    /// Creates a logger shipping over HTTP to `<endpoint>/<collector_code>`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(collector_code: &str, config: LoggerConfig) -> Result<Logger, TransportError> {
        let transport = HttpTransport::new()?;
        Ok(Logger::with_transport(collector_code, config, transport))
    }

    /// Creates a logger shipping through a custom transport.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_transport<T: Transport + 'static>(
        collector_code: &str,
        config: LoggerConfig,
        transport: T,
    ) -> Logger {
        let collector_url = config.collector_url(collector_code);
        let state = Arc::new(Mutex::new(DeliveryState::new(config.max_batch_len)));
        let flusher = Flusher::new(
            state.clone(),
            Arc::new(transport),
            &collector_url,
            config.request_timeout,
        );
        let flush_scheduler = FlushScheduler::spawn(config.effective_sync_interval(), flusher);
        Logger {
            state,
            collector_url,
            _flush_scheduler: flush_scheduler,
        }
    }

    /// Same as [`Logger::info`].
    pub fn log<T: Serialize + ?Sized>(&self, value: &T) {
        self.info(value);
    }

    pub fn info<T: Serialize + ?Sized>(&self, value: &T) {
        self.append_serialized(Level::Info, serialize(value));
    }

    pub fn warn<T: Serialize + ?Sized>(&self, value: &T) {
        self.append_serialized(Level::Warn, serialize(value));
    }

    pub fn error<T: Serialize + ?Sized>(&self, value: &T) {
        self.append_serialized(Level::Error, serialize(value));
    }

    /// Appends a record whose payload is already serialized JSON.
    ///
    /// See [`log_values!`](crate::log_values) for logging several values at once.
    pub fn append_serialized(&self, level: Level, data: String) {
        append_record(&self.state, level, data);
    }

    pub fn collector_url(&self) -> &str {
        &self.collector_url
    }

    /// Number of records waiting for an acknowledgement.
    pub fn pending_len(&self) -> usize {
        self.state.lock().queue().len()
    }

    /// True while a request to the collector is outstanding.
    pub fn is_sending(&self) -> bool {
        self.state.lock().is_sending()
    }

    #[cfg(test)]
    pub(crate) fn pending_records(&self) -> Vec<String> {
        self.state
            .lock()
            .queue()
            .peek_prefix(usize::MAX)
            .map(|(_, record)| record.to_string())
            .collect()
    }

    pub(crate) fn state(&self) -> Arc<Mutex<DeliveryState>> {
        self.state.clone()
    }
}

// Encoding happens before taking the lock: a payload that logs while being
// serialized must not deadlock.
pub(crate) fn append_record(state: &Mutex<DeliveryState>, level: Level, data: String) {
    let record = LogRecord::encode(level, data);
    state.lock().append(record.as_str());
}

/// Logs several values as a single record, whose payload is the list
/// of their serializations.
///
/// ```no_run
/// # async fn example() -> Result<(), shiplog::TransportError> {
/// use shiplog::{log_values, Level, Logger, LoggerConfig};
///
/// let logger = Logger::new("COLLECTOR-CODE", LoggerConfig::default())?;
/// log_values!(logger, Level::Warn, "cache miss", 42, vec!["a", "b"]);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! log_values {
    ($logger:expr, $level:expr, $value:expr $(,)?) => {
        $logger.append_serialized($level, $crate::serialize(&$value))
    };
    ($logger:expr, $level:expr, $($value:expr),+ $(,)?) => {
        $logger.append_serialized(
            $level,
            $crate::serialize_list([$($crate::serialize(&$value)),+].iter()),
        )
    };
}
