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

mod flusher;
mod http;
mod transport;

pub(crate) use self::flusher::Flusher;
pub use self::http::HttpTransport;
pub use self::transport::{is_delivered, DeliveryRequest, DeliveryResponse, Transport};

use crate::mem::RecordQueue;
use crate::position::Position;

/// The head of the queue, as it was when a delivery started.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub first_position: Position,
    pub num_records: usize,
    /// Records joined with `\n`.
    pub body: String,
}

/// Record queue plus the single in-flight delivery guarding it.
///
/// The two always change together, and callers are expected to hold them
/// under a single lock.
pub struct DeliveryState {
    queue: RecordQueue,
    // 0 when idle, size of the batch being sent otherwise.
    num_in_flight: usize,
    max_batch_len: usize,
}

impl DeliveryState {
    pub fn new(max_batch_len: usize) -> Self {
        DeliveryState {
            queue: RecordQueue::default(),
            num_in_flight: 0,
            max_batch_len: max_batch_len.max(1),
        }
    }

    pub fn append(&mut self, record: &str) -> Position {
        self.queue.append(record)
    }

    pub fn queue(&self) -> &RecordQueue {
        &self.queue
    }

    pub fn is_sending(&self) -> bool {
        self.num_in_flight > 0
    }

    pub fn num_in_flight(&self) -> usize {
        self.num_in_flight
    }

    /// Moves from idle to sending.
    ///
    /// Returns `None`, and changes nothing, if a delivery is already
    /// in flight or if there is nothing to send.
    pub fn start_delivery(&mut self) -> Option<Batch> {
        if self.is_sending() {
            return None;
        }
        let first_position = self.queue.first_position()?;
        let body = self.queue.prefix_body(self.max_batch_len)?.to_string();
        let num_records = self.queue.len().min(self.max_batch_len);
        self.num_in_flight = num_records;
        Some(Batch {
            first_position,
            num_records,
            body,
        })
    }

    /// Moves back to idle.
    ///
    /// On success, exactly the records of the in-flight batch are removed.
    /// Records appended in the meantime sit after them and are kept.
    /// On failure the queue is left untouched, and the same head is sent
    /// again by the next delivery.
    pub fn complete_delivery(&mut self, delivered: bool) {
        if delivered {
            self.queue.remove_prefix(self.num_in_flight);
        }
        self.num_in_flight = 0;
    }
}
