//! Decoding of Fauna wire responses
//!
//! Responses carry tagged values (`@ref`, `@ts`, `@date`, `@obj`, ...).
//! `@obj` only escapes objects whose keys collide with tags, so it is
//! unwrapped. Every other tag is kept verbatim and exports as its JSON form.

use crate::domain::{Collection, CollectionId, Cursor, DumpError, Page, Record, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Successful response envelope
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// Query result
    pub resource: Value,
}

/// Error response envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Errors reported by the service
    #[serde(default)]
    pub errors: Vec<QueryErrorDetail>,
}

/// One reported error
#[derive(Debug, Deserialize)]
pub struct QueryErrorDetail {
    /// Machine-readable error code, e.g. `unauthorized`
    #[serde(default)]
    pub code: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl ErrorResponse {
    /// Render all errors as `code: description; ...`
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.description))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Recursively unwrap `{"@obj": {...}}` escapes
pub fn unwrap_objects(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if map.len() == 1 && map.get("@obj").is_some_and(Value::is_object) {
                if let Some(Value::Object(inner)) = map.remove("@obj") {
                    return Value::Object(unwrap_map(inner));
                }
            }
            Value::Object(unwrap_map(map))
        }
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_objects).collect()),
        other => other,
    }
}

fn unwrap_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (k, unwrap_objects(v)))
        .collect()
}

/// Id of a `{"@ref": {"id": ...}}` value
pub fn ref_id(value: &Value) -> Option<&str> {
    value.get("@ref")?.get("id")?.as_str()
}

fn malformed(what: &str) -> DumpError {
    DumpError::FatalQuery(format!("malformed response: {what}"))
}

fn split_page(resource: Value) -> Result<(Vec<Value>, Option<Cursor>)> {
    let Value::Object(mut page) = resource else {
        return Err(malformed("page is not an object"));
    };
    let data = match page.remove("data") {
        Some(Value::Array(items)) => items,
        _ => return Err(malformed("page has no data array")),
    };
    let after = page
        .remove("after")
        .filter(|v| !v.is_null())
        .map(Cursor::new);
    Ok((data, after))
}

/// Decode a page of collection references
pub fn decode_collections(resource: Value) -> Result<(Vec<Collection>, Option<Cursor>)> {
    let (items, after) = split_page(resource)?;
    let collections = items
        .into_iter()
        .map(|reference| {
            let id = ref_id(&reference)
                .ok_or_else(|| malformed("collection entry is not a reference"))?;
            let id = CollectionId::new(id).map_err(|e| malformed(&e))?;
            Ok(Collection::new(id, reference))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((collections, after))
}

/// Decode one shaped item: `{collection: <document>, relations: {...}}`
pub fn decode_record(item: Value) -> Result<Record> {
    let Value::Object(mut item) = item else {
        return Err(malformed("record is not an object"));
    };
    let Some(Value::Object(mut document)) = item.remove("collection") else {
        return Err(malformed("record has no collection document"));
    };

    let id = document
        .get("ref")
        .and_then(ref_id)
        .ok_or_else(|| malformed("document has no reference"))?
        .to_string();

    let data = match document.remove("data") {
        Some(Value::Object(data)) => data,
        _ => Map::new(),
    };
    let relations = match item.remove("relations") {
        Some(Value::Object(relations)) => relations,
        _ => Map::new(),
    };

    Ok(Record::new(id, data).with_relations(relations))
}

/// Decode a page of shaped records
pub fn decode_page(resource: Value) -> Result<Page> {
    let (items, after) = split_page(resource)?;
    let records = items
        .into_iter()
        .map(decode_record)
        .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(records, after))
}
