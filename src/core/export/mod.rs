//! Export pipeline
//!
//! This module provides the export logic for fauna-dump:
//! - [`enumerator`] - collection listing and include-list filtering
//! - [`fetcher`] - lazy, retried, cursor-driven page stream
//! - [`progress`] - running record count and progress events
//! - [`serializer`] - pages to CSV text chunks
//! - [`sink`] - CSV chunks to files
//! - [`coordinator`] - the run itself
//! - [`summary`] - per-run reporting

pub mod coordinator;
pub mod enumerator;
pub mod fetcher;
pub mod options;
pub mod progress;
pub mod serializer;
pub mod sink;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use options::ExportOptions;
pub use progress::{ProgressEvent, ProgressTracker};
pub use summary::{CollectionSummary, ExportSummary};
