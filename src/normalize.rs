use serde_json::{Map, Value};

use crate::domain::{PaperId, Record};
use crate::error::IngestError;
use crate::feed::FeedValue;

/// Structural copy of a feed tree into plain JSON values.
pub fn to_plain(value: &FeedValue) -> Value {
    match value {
        FeedValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_plain(value)))
                .collect(),
        ),
        FeedValue::List(items) => Value::Array(items.iter().map(to_plain).collect()),
        FeedValue::Text(text) => Value::String(text.clone()),
    }
}

/// Flattens one feed entry into a [`Record`], deriving `_rawid` and
/// `_version` from its `id` URL. A malformed URL fails the whole entry.
pub fn normalize_entry(entry: &FeedValue) -> Result<Record, IngestError> {
    let fields = match to_plain(entry) {
        Value::Object(fields) => fields,
        other => {
            return Err(IngestError::MalformedEntry(format!(
                "expected a mapping, got {}",
                kind_of(&other)
            )));
        }
    };
    let url = entry_url(&fields)?;
    let id: PaperId = url.parse()?;
    Ok(Record::new(id, fields))
}

fn entry_url(fields: &Map<String, Value>) -> Result<String, IngestError> {
    fields
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| IngestError::MissingField {
            field: "id".to_string(),
        })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
