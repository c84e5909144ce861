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

use std::fmt::{self, Write};

use serde::Serialize;

/// JSON text emitted when a value cannot be serialized at all.
pub const SERIALIZATION_FALLBACK: &str = "\"error serializing log line\"";

/// Serializes `value` as compact JSON.
///
/// This never fails: if `serde_json` rejects the value,
/// the [`SERIALIZATION_FALLBACK`] placeholder is returned instead.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_string())
}

/// Same as [`serialize`], but falls back to the JSON string of the
/// `Display` form of the value before giving up.
pub fn serialize_display<T: Serialize + fmt::Display + ?Sized>(value: &T) -> String {
    if let Ok(json) = serde_json::to_string(value) {
        return json;
    }
    text_form(value)
        .ok()
        .and_then(|text| serde_json::to_string(&text).ok())
        .unwrap_or_else(|| SERIALIZATION_FALLBACK.to_string())
}

// `ToString` panics on a failing `Display` impl, `write!` reports it.
fn text_form<T: fmt::Display + ?Sized>(value: &T) -> Result<String, fmt::Error> {
    let mut text = String::new();
    write!(text, "{}", value)?;
    Ok(text)
}

/// Packs several already serialized values into a JSON array.
pub fn serialize_list<I>(serialized_items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut list = String::from("[");
    for (idx, item) in serialized_items.into_iter().enumerate() {
        if idx > 0 {
            list.push(',');
        }
        list.push_str(item.as_ref());
    }
    list.push(']');
    list
}
