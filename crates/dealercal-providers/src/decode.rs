//! Decoding of collection bodies.
//!
//! The backend answers with a bare JSON array. Some deployments wrap it in
//! `{"data": [...]}` or `{"items": [...]}`; both are accepted. A single bad
//! record is skipped with a warning so the rest of the collection still
//! renders.

use dealercal_core::Source;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, ProviderResult};

const ENVELOPE_KEYS: [&str; 2] = ["data", "items"];

/// Decodes a response body into the records of one collection.
pub fn decode_collection<T: DeserializeOwned>(body: &str, source: Source) -> ProviderResult<Vec<T>> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("body is not JSON: {}", e))
            .for_source(source)
            .with_cause(e)
    })?;

    let elements = match value {
        Value::Array(elements) => elements,
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(elements)) => Some(elements),
                _ => None,
            })
            .ok_or_else(|| {
                ProviderError::invalid_response("expected an array of records").for_source(source)
            })?,
        other => {
            return Err(ProviderError::invalid_response(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            ))
            .for_source(source));
        }
    };

    Ok(decode_values(elements, source))
}

/// Decodes each element, dropping the ones that do not match the record shape.
pub(crate) fn decode_values<T: DeserializeOwned>(elements: Vec<Value>, source: Source) -> Vec<T> {
    let total = elements.len();
    let records: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source = %source, index, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect();

    tracing::debug!(source = %source, total, decoded = records.len(), "decoded collection");
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
