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

use std::fmt::Display;
use std::ops::Add;

/// Sequence number of a record within a `RecordQueue`.
///
/// Positions are assigned at append time and never reused, so the
/// record at the head of the queue keeps its position after earlier
/// records have been delivered and trimmed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Default, Hash)]
pub struct Position(pub u64);

impl Add<u64> for Position {
    type Output = Position;

    fn add(self, rhs: u64) -> Position {
        Position(self.0 + rhs)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
