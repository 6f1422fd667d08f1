//! Query service trait definition
//!
//! This module defines the `QueryService` trait that abstracts the remote
//! document database. The export pipeline only ever talks to this trait, so
//! it can run against the Fauna HTTP client or an in-memory fake in tests.

use crate::domain::{Collection, Cursor, DumpError, Page, RecordShape, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// How a collection is read
///
/// The two modes are mutually exclusive and selected by whether a start time
/// is configured, see [`ReadMode::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadMode {
    /// Every document as it existed at a fixed instant
    FullSnapshot {
        /// Snapshot instant
        at: DateTime<Utc>,
    },

    /// Only documents touched in `(start, end]`, read through a secondary index
    Incremental {
        /// Name of the index whose values start with the document timestamp
        index: String,
        /// Exclusive lower bound
        start: DateTime<Utc>,
        /// Inclusive upper bound
        end: DateTime<Utc>,
    },
}

impl ReadMode {
    /// Pick the read mode for one collection
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `start` is after `end`, or if a start
    /// time is set but no index is named for the collection.
    pub fn select(
        start: Option<DateTime<Utc>>,
        end: DateTime<Utc>,
        index: Option<String>,
    ) -> Result<Self> {
        match start {
            None => Ok(ReadMode::FullSnapshot { at: end }),
            Some(start) if start > end => Err(DumpError::Configuration(format!(
                "start time {} is after end time {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            ))),
            Some(start) => {
                let index = index.filter(|i| !i.trim().is_empty()).ok_or_else(|| {
                    DumpError::Configuration(
                        "incremental export requires a collection index".to_string(),
                    )
                })?;
                Ok(ReadMode::Incremental { index, start, end })
            }
        }
    }

    /// Whether this is the incremental range mode
    pub fn is_incremental(&self) -> bool {
        matches!(self, ReadMode::Incremental { .. })
    }

    /// Upper bound of the read
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            ReadMode::FullSnapshot { at } => *at,
            ReadMode::Incremental { end, .. } => *end,
        }
    }

    /// First instant included by an incremental read
    ///
    /// Timestamps have microsecond resolution, so one microsecond past the
    /// start makes an inclusive range behave as an exclusive lower bound.
    pub fn inclusive_start(&self) -> Option<DateTime<Utc>> {
        match self {
            ReadMode::FullSnapshot { .. } => None,
            ReadMode::Incremental { start, .. } => Some(*start + Duration::microseconds(1)),
        }
    }
}

/// Everything needed to fetch one page
///
/// A request is built once per page and re-sent unchanged on retry.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Collection being read
    pub collection: Collection,

    /// Read mode
    pub mode: ReadMode,

    /// Maximum records per page
    pub page_size: usize,

    /// Continuation cursor, `None` for the first page
    pub after: Option<Cursor>,

    /// Per-document projection
    pub shape: RecordShape,
}

/// Trait for the remote document database
#[async_trait]
pub trait QueryService: Send + Sync {
    /// List every collection known to the database, in service order
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Connectivity`] when the service cannot be reached.
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    /// Fetch one page of shaped records
    ///
    /// # Errors
    ///
    /// Implementations classify failures as [`DumpError::TransientQuery`]
    /// (worth retrying) or [`DumpError::FatalQuery`].
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;

    /// Endpoint description used in logs
    fn endpoint(&self) -> &str;
}
