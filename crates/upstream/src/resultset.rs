//! Row extraction for the stats origin's tabular payload shape.
//!
//! Most stats endpoints respond with
//! `{"resultSets": [{"headers": [...], "rowSet": [[...], ...]}]}`.
//! Rows are positional; zipping each row against the headers yields the
//! field-name -> value records the rest of the system works with.

use serde_json::{Map, Value};

/// Zip the first result set's rows against its headers.
///
/// Malformed or empty payloads yield an empty vec; the upstream schema
/// is taken as-is and never validated.
pub fn rows_from_result_sets(payload: &Value) -> Vec<Value> {
    rows_from_result_set(payload, 0)
}

/// Zip the `index`-th result set's rows against its headers.
pub fn rows_from_result_set(payload: &Value, index: usize) -> Vec<Value> {
    let Some(set) = payload
        .get("resultSets")
        .and_then(Value::as_array)
        .and_then(|sets| sets.get(index))
    else {
        return Vec::new();
    };

    let Some(headers) = set.get("headers").and_then(Value::as_array) else {
        return Vec::new();
    };
    let Some(rows) = set.get("rowSet").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| {
            let mut record = Map::new();
            for (header, value) in headers.iter().zip(row) {
                if let Some(name) = header.as_str() {
                    record.insert(name.to_string(), value.clone());
                }
            }
            Value::Object(record)
        })
        .collect()
}
