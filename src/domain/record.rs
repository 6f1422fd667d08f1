//! Collections, pages and records
//!
//! These are read-only snapshots pulled from the database. They are never
//! mutated, only flattened into [`Row`]s on their way to the CSV sink.

use super::ids::{CollectionId, Cursor};
use serde_json::{Map, Value};

/// A flattened record: column name to raw value, in field order
pub type Row = Map<String, Value>;

/// A named collection in the source database
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collection name
    pub id: CollectionId,

    /// Service-specific reference used to build queries against the collection
    pub reference: Value,
}

impl Collection {
    /// Create a collection from its id and reference
    pub fn new(id: CollectionId, reference: Value) -> Self {
        Self { id, reference }
    }
}

/// One raw record as produced by the record shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Document identifier, taken from the document reference
    pub id: String,

    /// Core document fields
    pub data: Map<String, Value>,

    /// Derived fields computed by the record shape
    pub relations: Map<String, Value>,
}

impl Record {
    /// Create a record with no relations
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
            relations: Map::new(),
        }
    }

    /// Attach derived fields
    pub fn with_relations(mut self, relations: Map<String, Value>) -> Self {
        self.relations = relations;
        self
    }

    /// Flatten into a single row
    ///
    /// Precedence, later overriding earlier: `id`, document fields, relations.
    /// An overridden key keeps the position of its first occurrence.
    pub fn flatten(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::String(self.id.clone()));
        for (key, value) in self.data.iter().chain(self.relations.iter()) {
            row.insert(key.clone(), value.clone());
        }
        row
    }
}

/// One page of records plus the continuation cursor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Records in service order
    pub records: Vec<Record>,

    /// Cursor for the next page, `None` on the final page
    pub after: Option<Cursor>,
}

impl Page {
    /// Create a page
    pub fn new(records: Vec<Record>, after: Option<Cursor>) -> Self {
        Self { records, after }
    }

    /// Number of records in the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.after.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_flatten_orders_id_first() {
        let record = Record::new("101", object(json!({"name": "Ada", "email": "ada@example.com"})));
        let row = record.flatten();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "email"]);
        assert_eq!(row["id"], json!("101"));
    }

    #[test]
    fn test_flatten_precedence() {
        let record = Record::new("101", object(json!({"id": "shadowed", "name": "Ada"})))
            .with_relations(object(json!({"name": "Ada Lovelace", "team": "core"})));
        let row = record.flatten();

        assert_eq!(row["id"], json!("shadowed"));
        assert_eq!(row["name"], json!("Ada Lovelace"));
        assert_eq!(row["team"], json!("core"));
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "team"]);
    }

    #[test]
    fn test_page_helpers() {
        let page = Page::new(vec![Record::default()], None);
        assert_eq!(page.len(), 1);
        assert!(!page.is_empty());
        assert!(!page.has_next());
    }
}
