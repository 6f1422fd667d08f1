//! FQL v4 query construction
//!
//! Queries are built directly in the JSON wire encoding accepted by the Fauna
//! HTTP endpoint. Each helper mirrors one FQL function.

use crate::adapters::service::{PageRequest, ReadMode};
use crate::domain::{Cursor, RecordShape, RelationSpec};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Page size used when listing collections
pub const COLLECTION_PAGE_SIZE: usize = 1000;

fn time(instant: DateTime<Utc>) -> Value {
    json!({ "time": instant.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

fn var(name: &str) -> Value {
    json!({ "var": name })
}

fn get(reference: Value) -> Value {
    json!({ "get": reference })
}

fn select_or_null(path: &[String], from: Value) -> Value {
    json!({ "select": path, "from": from, "default": null })
}

fn object(fields: Map<String, Value>) -> Value {
    json!({ "object": fields })
}

fn let_in(name: &str, value: Value, body: Value) -> Value {
    let mut binding = Map::new();
    binding.insert(name.to_string(), value);
    json!({ "let": [binding], "in": body })
}

fn if_then_else(cond: Value, then: Value, otherwise: Value) -> Value {
    json!({ "if": cond, "then": then, "else": otherwise })
}

fn paginate(set: Value, size: usize, after: Option<&Cursor>) -> Value {
    let mut query = json!({ "paginate": set, "size": size });
    if let Some(cursor) = after {
        query["after"] = cursor.as_value().clone();
    }
    query
}

/// `Paginate(Collections(), {size, after})`
pub fn list_collections(after: Option<&Cursor>) -> Value {
    paginate(json!({ "collections": null }), COLLECTION_PAGE_SIZE, after)
}

/// Resolve one relation, yielding null when the reference is missing or dangling
fn relation(spec: &RelationSpec) -> Value {
    let target = if spec.select.is_empty() {
        get(var("rel"))
    } else {
        select_or_null(&spec.select, get(var("rel")))
    };

    let_in(
        "rel",
        select_or_null(&spec.ref_path, var("doc")),
        if_then_else(
            json!({ "is_ref": var("rel") }),
            if_then_else(json!({ "exists": var("rel") }), target, Value::Null),
            Value::Null,
        ),
    )
}

/// Compile a record shape into the per-document lambda
///
/// Every matched item becomes `{collection: <document>, relations: {...}}`.
/// In incremental mode the index yields `[ts, ref]` pairs, so the lambda
/// takes the match time as an extra leading argument.
pub fn shape_lambda(shape: &RecordShape, incremental: bool) -> Value {
    let params = if incremental {
        json!(["ts", "ref"])
    } else {
        json!("ref")
    };

    let relations: Map<String, Value> = shape
        .relations
        .iter()
        .map(|spec| (spec.name.clone(), relation(spec)))
        .collect();

    let mut body = Map::new();
    body.insert("collection".to_string(), var("doc"));
    body.insert("relations".to_string(), object(relations));

    json!({
        "lambda": params,
        "expr": let_in("doc", get(var("ref")), object(body)),
    })
}

/// Build the paged query for one request
///
/// Full snapshot:
/// `At(Time(end), Map(Paginate(Documents(coll), {size, after}), lambda))`
///
/// Incremental:
/// `Map(Paginate(Range(Match(Index(index)), Time(start'), Time(end)), {size, after}), lambda)`
pub fn page(request: &PageRequest) -> Value {
    let lambda = shape_lambda(&request.shape, request.mode.is_incremental());

    match &request.mode {
        ReadMode::FullSnapshot { at } => {
            let set = json!({ "documents": request.collection.reference });
            json!({
                "at": time(*at),
                "expr": {
                    "map": lambda,
                    "collection": paginate(set, request.page_size, request.after.as_ref()),
                },
            })
        }
        ReadMode::Incremental { index, end, .. } => {
            let start = request.mode.inclusive_start().unwrap_or(*end);
            let set = json!({
                "range": { "match": { "index": index } },
                "from": time(start),
                "to": time(*end),
            });
            json!({
                "map": lambda,
                "collection": paginate(set, request.page_size, request.after.as_ref()),
            })
        }
    }
}
