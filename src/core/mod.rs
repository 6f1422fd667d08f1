//! Core business logic for fauna-dump.
//!
//! # Modules
//!
//! - [`export`] - Export pipeline and orchestration
//! - [`hooks`] - Pluggable per-collection behaviour
//! - [`retry`] - Retry policy for page queries
//!
//! # Export Workflow
//!
//! 1. **Enumerate**: list all collections and apply the include-list
//! 2. **Fetch**: page through each collection at a fixed point in time, or
//!    over a time range through an index
//! 3. **Track**: count records and report progress per page
//! 4. **Serialize**: flatten records and encode them as CSV rows
//! 5. **Write**: stream the rows into `<output_dir>/<name>.csv`
//! 6. **Report**: log the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use fauna_dump::config::load_config;
//! use fauna_dump::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fauna-dump.toml")?;
//! let coordinator = ExportCoordinator::from_config(&config)?;
//!
//! let summary = coordinator.execute_export().await?;
//! println!("Records: {}", summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod hooks;
pub mod retry;
