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

use crate::mem::RecordMeta;
use crate::position::Position;

const RECORD_SEPARATOR: char = '\n';

/// Ordered, append-only queue of serialized records awaiting delivery.
///
/// Records are only ever removed as a contiguous prefix.
/// The queue has no upper bound: if the collector stays unreachable,
/// it grows for as long as the application keeps logging.
#[derive(Default)]
pub struct RecordQueue {
    // Concatenated records, each one followed by a separator.
    concatenated_records: String,
    start_position: Position,
    record_metas: Vec<RecordMeta>,
}

impl RecordQueue {
    pub fn len(&self) -> usize {
        self.record_metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_metas.is_empty()
    }

    /// Position of the record at the head of the queue, if any.
    pub fn first_position(&self) -> Option<Position> {
        if self.is_empty() {
            return None;
        }
        Some(self.start_position)
    }

    /// Position the next appended record will get.
    pub fn next_position(&self) -> Position {
        self.start_position + self.record_metas.len() as u64
    }

    /// Size in bytes of the retained records, separators included.
    pub fn num_bytes(&self) -> usize {
        self.concatenated_records.len()
    }

    /// Appends a record at the tail of the queue and returns its position.
    pub fn append(&mut self, record: &str) -> Position {
        let position = self.next_position();
        self.record_metas.push(RecordMeta {
            start_offset: self.concatenated_records.len(),
        });
        self.concatenated_records.push_str(record);
        self.concatenated_records.push(RECORD_SEPARATOR);
        position
    }

    // Byte range of the record at `idx`, separator excluded.
    fn record_range(&self, idx: usize) -> (usize, usize) {
        let start_offset = self.record_metas[idx].start_offset;
        let end_offset = self
            .record_metas
            .get(idx + 1)
            .map(|next_record_meta| next_record_meta.start_offset)
            .unwrap_or_else(|| self.concatenated_records.len());
        (start_offset, end_offset - RECORD_SEPARATOR.len_utf8())
    }

    /// Iterates over at most `num_records` records from the head of the queue.
    pub fn peek_prefix(&self, num_records: usize) -> impl Iterator<Item = (Position, &str)> + '_ {
        let end_idx = num_records.min(self.record_metas.len());
        (0..end_idx).map(move |idx| {
            let (start_offset, end_offset) = self.record_range(idx);
            (
                self.start_position + idx as u64,
                &self.concatenated_records[start_offset..end_offset],
            )
        })
    }

    /// Returns the first `num_records` records (or all of them, if there are fewer)
    /// joined with newlines, without copying.
    ///
    /// Returns `None` if the queue is empty or `num_records` is 0.
    pub fn prefix_body(&self, num_records: usize) -> Option<&str> {
        let end_idx = num_records.min(self.record_metas.len());
        if end_idx == 0 {
            return None;
        }
        let (_, end_offset) = self.record_range(end_idx - 1);
        Some(&self.concatenated_records[..end_offset])
    }

    /// Removes the first `num_records` records.
    ///
    /// Callers are expected to pass a count they obtained by peeking the same,
    /// unmodified prefix. A count larger than the queue clears it.
    pub fn remove_prefix(&mut self, num_records: usize) {
        if num_records == 0 {
            return;
        }
        if num_records >= self.record_metas.len() {
            self.start_position = self.next_position();
            self.concatenated_records.clear();
            self.record_metas.clear();
            return;
        }
        let start_offset_to_keep: usize = self.record_metas[num_records].start_offset;
        self.record_metas.drain(..num_records);
        for record_meta in &mut self.record_metas {
            record_meta.start_offset -= start_offset_to_keep;
        }
        self.concatenated_records.drain(..start_offset_to_keep);
        self.start_position = self.start_position + num_records as u64;
    }
}
