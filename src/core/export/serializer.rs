//! CSV row serialization
//!
//! Cells are the JSON text of the value, which quotes and escapes embedded
//! commas, quotes and newlines. A `null` cell is written as an empty cell;
//! `null`s nested inside arrays and objects become the JSON string `""`.
//!
//! Framing: the header row comes first and exactly once. Every page that
//! still has rows after [`ExportHooks::append_data`] contributes `"\r\n"`
//! followed by its rows joined by `"\r\n"`; pages without rows contribute
//! nothing.

use crate::core::hooks::ExportHooks;
use crate::domain::{CollectionId, DumpError, Page, Result, Row};
use futures::stream::{self, BoxStream, StreamExt};
use futures::TryStreamExt;
use serde_json::Value;

const ROW_SEPARATOR: &str = "\r\n";
const CELL_SEPARATOR: &str = ",";

/// Encode one value as a CSV cell
///
/// # Errors
///
/// Returns a serialization error if the value cannot be encoded.
pub fn encode_cell(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        other => Ok(serde_json::to_string(&blank_nested_nulls(other))?),
    }
}

fn blank_nested_nulls(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Array(items) => Value::Array(items.iter().map(blank_nested_nulls).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), blank_nested_nulls(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Stateful serializer for one collection
pub struct RowSerializer<'a> {
    collection: CollectionId,
    hooks: &'a dyn ExportHooks,
    headers: Option<Vec<String>>,
    header_written: bool,
}

impl<'a> RowSerializer<'a> {
    /// Create a serializer; explicit headers from the hooks are fixed up front
    pub fn new(collection: CollectionId, hooks: &'a dyn ExportHooks) -> Self {
        let headers = hooks
            .headers(&collection)
            .filter(|headers| !headers.is_empty());
        Self {
            collection,
            hooks,
            headers,
            header_written: false,
        }
    }

    /// Headers in effect, once known
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn infer_headers(&mut self, first: &Row) {
        if self.headers.is_some() {
            return;
        }
        let headers: Vec<String> = first
            .keys()
            .filter_map(|key| self.hooks.transform_header(key))
            .filter(|header| !header.is_empty())
            .collect();
        tracing::debug!(
            collection = %self.collection,
            headers = ?headers,
            "Inferred headers"
        );
        self.headers = Some(headers);
    }

    fn take_header_line(&mut self) -> Option<String> {
        if self.header_written {
            return None;
        }
        let headers = self.headers.as_ref()?;
        self.header_written = true;
        Some(headers.join(CELL_SEPARATOR))
    }

    fn encode_row(&self, headers: &[String], row: &Row) -> Result<String> {
        let cells = headers
            .iter()
            .map(|header| encode_cell(&self.hooks.transform_data(header, row, &self.collection)))
            .collect::<Result<Vec<_>>>()?;
        Ok(cells.join(CELL_SEPARATOR))
    }

    /// Serialize one page into a text chunk, possibly empty
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a cell cannot be encoded.
    pub fn serialize_page(&mut self, page: &Page) -> Result<String> {
        let rows: Vec<Row> = page.records.iter().map(|r| r.flatten()).collect();
        if let Some(first) = rows.first() {
            self.infer_headers(first);
        }

        let rows = self.hooks.append_data(&self.collection, rows);
        if let Some(first) = rows.first() {
            self.infer_headers(first);
        }

        let mut chunk = self.take_header_line().unwrap_or_default();
        if rows.is_empty() {
            return Ok(chunk);
        }

        let headers = self.headers.as_deref().ok_or_else(|| {
            DumpError::Serialization(format!("no headers for collection {}", self.collection))
        })?;
        let lines = rows
            .iter()
            .map(|row| self.encode_row(headers, row))
            .collect::<Result<Vec<_>>>()?;

        chunk.push_str(ROW_SEPARATOR);
        chunk.push_str(&lines.join(ROW_SEPARATOR));
        Ok(chunk)
    }

    /// Flush whatever is still owed at end of stream
    ///
    /// For a collection with no records this is the header row when headers
    /// were given explicitly, otherwise nothing.
    pub fn finish(&mut self) -> String {
        self.take_header_line().unwrap_or_default()
    }
}

enum SerializeState<'a> {
    Pages(BoxStream<'a, Result<Page>>, RowSerializer<'a>),
    Done,
}

/// Turn a page stream into a stream of non-empty CSV text chunks
pub fn serialize_pages<'a>(
    pages: BoxStream<'a, Result<Page>>,
    serializer: RowSerializer<'a>,
) -> BoxStream<'a, Result<String>> {
    stream::try_unfold(
        SerializeState::Pages(pages, serializer),
        |state| async move {
            let (mut pages, mut serializer) = match state {
                SerializeState::Pages(pages, serializer) => (pages, serializer),
                SerializeState::Done => return Ok::<_, DumpError>(None),
            };

            match pages.try_next().await? {
                Some(page) => {
                    let chunk = serializer.serialize_page(&page)?;
                    Ok(Some((chunk, SerializeState::Pages(pages, serializer))))
                }
                None => Ok(Some((serializer.finish(), SerializeState::Done))),
            }
        },
    )
    .try_filter(|chunk| futures::future::ready(!chunk.is_empty()))
    .boxed()
}
