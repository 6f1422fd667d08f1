//! Pluggable export hooks
//!
//! Every caller-tunable behaviour of an export is one method on
//! [`ExportHooks`], each with a default. [`DefaultHooks`] uses all defaults;
//! [`ConfigHooks`] derives the hooks from the TOML configuration.

use crate::config::schema::{CollectionOverrides, DumpConfig, FileNameCase};
use crate::core::export::progress::ProgressEvent;
use crate::domain::{CollectionId, DumpError, RecordShape, Result, Row};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Strategy object carrying the pluggable behaviour of an export
pub trait ExportHooks: Send + Sync {
    /// Secondary index used for incremental reads of `collection`
    fn collection_index(&self, _collection: &CollectionId) -> Option<String> {
        None
    }

    /// Derived fields to compute for every document of `collection`
    fn record_shape(&self, _collection: &CollectionId) -> RecordShape {
        RecordShape::document_only()
    }

    /// Explicit column list; `None` or an empty list means "infer"
    fn headers(&self, _collection: &CollectionId) -> Option<Vec<String>> {
        None
    }

    /// Rename an inferred header; `None` drops the column
    fn transform_header(&self, header: &str) -> Option<String> {
        Some(header.to_string())
    }

    /// Resolve the raw value of one cell
    fn transform_data(&self, header: &str, row: &Row, _collection: &CollectionId) -> Value {
        row.get(header).cloned().unwrap_or(Value::Null)
    }

    /// Post-process the flattened rows of one page
    fn append_data(&self, _collection: &CollectionId, rows: Vec<Row>) -> Vec<Row> {
        rows
    }

    /// Output file name, without the `.csv` suffix
    fn file_name(&self, collection: &CollectionId) -> String {
        collection.to_string()
    }

    /// Called after every page
    ///
    /// # Errors
    ///
    /// An error aborts the export.
    fn on_progress(&self, event: &ProgressEvent) -> Result<()> {
        tracing::info!(
            collection = %event.collection,
            page_records = event.page_records,
            total = event.total,
            after = event.after.as_ref().map(|c| c.to_string()),
            "{event}"
        );
        Ok(())
    }

    /// Called for every failed page query that is about to be retried
    fn on_failed_attempt(
        &self,
        collection: &CollectionId,
        attempt: usize,
        error: &DumpError,
        delay: Duration,
    ) {
        tracing::warn!(
            collection = %collection,
            attempt = attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Retrying page query after error"
        );
    }
}

/// Hooks with every default
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl ExportHooks for DefaultHooks {}

/// Hooks driven by the `[export]` and `[collection.<Name>]` configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigHooks {
    index_template: Option<String>,
    file_name_case: FileNameCase,
    drop_headers: Vec<String>,
    rename_headers: HashMap<String, String>,
    collections: HashMap<String, CollectionOverrides>,
}

impl ConfigHooks {
    /// Build hooks from the loaded configuration
    pub fn from_config(config: &DumpConfig) -> Self {
        Self {
            index_template: config.export.index_template.clone(),
            file_name_case: config.export.file_name_case,
            drop_headers: config.export.drop_headers.clone(),
            rename_headers: config.export.rename_headers.clone(),
            collections: config.collection.clone(),
        }
    }

    /// Per-collection overrides; table names match case-insensitively
    fn overrides(&self, collection: &CollectionId) -> Option<&CollectionOverrides> {
        self.collections.get(collection.as_str()).or_else(|| {
            self.collections
                .iter()
                .find(|(name, _)| collection.matches(name))
                .map(|(_, overrides)| overrides)
        })
    }
}

/// Look up a `/`-separated path inside a row
///
/// Array elements are addressed by their index.
pub fn lookup_path<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let mut current = row.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

impl ExportHooks for ConfigHooks {
    fn collection_index(&self, collection: &CollectionId) -> Option<String> {
        self.overrides(collection)
            .and_then(|o| o.index.clone())
            .or_else(|| {
                self.index_template
                    .as_ref()
                    .map(|template| template.replace("{collection}", collection.as_str()))
            })
    }

    fn record_shape(&self, collection: &CollectionId) -> RecordShape {
        self.overrides(collection)
            .map(|o| RecordShape {
                relations: o.relations.clone(),
            })
            .unwrap_or_default()
    }

    fn headers(&self, collection: &CollectionId) -> Option<Vec<String>> {
        self.overrides(collection)
            .and_then(|o| o.headers.clone())
            .filter(|headers| !headers.is_empty())
    }

    fn transform_header(&self, header: &str) -> Option<String> {
        if self.drop_headers.iter().any(|h| h == header) {
            return None;
        }
        Some(
            self.rename_headers
                .get(header)
                .cloned()
                .unwrap_or_else(|| header.to_string()),
        )
    }

    fn transform_data(&self, header: &str, row: &Row, collection: &CollectionId) -> Value {
        let source = self
            .overrides(collection)
            .and_then(|o| o.columns.get(header))
            .map(String::as_str);

        let value = match source {
            Some(path) => lookup_path(row, path),
            None => row.get(header).or_else(|| {
                // A renamed header still reads from its original field
                self.rename_headers
                    .iter()
                    .find(|(_, renamed)| renamed.as_str() == header)
                    .and_then(|(original, _)| row.get(original))
            }),
        };
        value.cloned().unwrap_or(Value::Null)
    }

    fn file_name(&self, collection: &CollectionId) -> String {
        if let Some(name) = self.overrides(collection).and_then(|o| o.file_name.clone()) {
            return name;
        }
        match self.file_name_case {
            FileNameCase::Preserve => collection.to_string(),
            FileNameCase::Lower => collection.as_str().to_lowercase(),
            FileNameCase::Upper => collection.as_str().to_uppercase(),
        }
    }
}
