//! Run options for one export

use crate::config::schema::{DumpConfig, MAX_PAGE_SIZE};
use crate::core::retry::RetryPolicy;
use crate::domain::{DumpError, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Immutable configuration of an export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving the CSV files
    pub output_dir: PathBuf,

    /// Collections to export, matched ignoring ASCII case; empty exports all
    pub collections: Vec<String>,

    /// Records per page query
    pub page_size: usize,

    /// Exclusive lower bound; `Some` selects incremental reads
    pub start_time: Option<DateTime<Utc>>,

    /// Snapshot instant and inclusive upper bound
    pub end_time: DateTime<Utc>,

    /// Retry policy for page queries
    pub retry: RetryPolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            collections: Vec::new(),
            page_size: 1000,
            start_time: None,
            end_time: Utc::now(),
            retry: RetryPolicy::forever(),
        }
    }
}

impl ExportOptions {
    /// Build options from the loaded configuration
    ///
    /// A missing end point in time resolves to now.
    pub fn from_config(config: &DumpConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.export.output_dir),
            collections: config.export.collections.clone(),
            page_size: config.export.page_size,
            start_time: config.export.start_point_in_time,
            end_time: config.export.end_point_in_time.unwrap_or_else(Utc::now),
            retry: RetryPolicy::from_config(&config.database.retry),
        }
    }

    /// Check the run invariants
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Configuration`] if the start time is after the
    /// end time or the page size is out of range.
    pub fn validate(&self) -> Result<()> {
        if let Some(start) = self.start_time {
            if start > self.end_time {
                return Err(DumpError::Configuration(format!(
                    "start time {} is after end time {}",
                    start.to_rfc3339(),
                    self.end_time.to_rfc3339()
                )));
            }
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DumpError::Configuration(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        Ok(())
    }
}
