//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::CollectionId;
use std::path::PathBuf;
use std::time::Duration;

/// Result of exporting one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    /// Exported collection
    pub collection: CollectionId,

    /// Records fetched from the database
    pub records: usize,

    /// Pages fetched from the database
    pub pages: usize,

    /// CSV file written
    pub file: PathBuf,

    /// Time spent on this collection
    pub duration: Duration,
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Per-collection results, in export order
    pub collections: Vec<CollectionSummary>,

    /// Records fetched across all collections
    pub total_records: usize,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a finished collection
    pub fn add_collection(&mut self, collection: CollectionSummary) {
        self.total_records += collection.records;
        self.collections.push(collection);
    }

    /// Look up the result for one collection
    pub fn collection(&self, id: &str) -> Option<&CollectionSummary> {
        self.collections.iter().find(|c| c.collection.matches(id))
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            collections = self.collections.len(),
            total_records = self.total_records,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for collection in &self.collections {
            tracing::debug!(
                collection = %collection.collection,
                records = collection.records,
                pages = collection.pages,
                file = %collection.file.display(),
                duration_ms = collection.duration.as_millis() as u64,
                "Collection exported"
            );
        }
    }
}
