// fauna-dump - Fauna collection to CSV export tool
// Copyright (c) 2025 fauna-dump Contributors
// Licensed under the MIT License

//! # fauna-dump - Fauna collections to CSV
//!
//! fauna-dump exports the documents of a Fauna database (FQL v4 wire
//! protocol) into one CSV file per collection, either as a consistent
//! snapshot at a fixed instant or incrementally over a time range.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline, hooks and retry policy
//! - [`adapters`] - Query service trait and the Fauna HTTP client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fauna_dump::config::load_config;
//! use fauna_dump::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("fauna-dump.toml")?;
//!     let coordinator = ExportCoordinator::from_config(&config)?;
//!
//!     let summary = coordinator.execute_export().await?;
//!     println!("Exported {} records", summary.total_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Hooks
//!
//! Every tunable behaviour is a method of [`core::hooks::ExportHooks`] with a
//! default, so a caller overrides only what it needs:
//!
//! ```rust,no_run
//! use fauna_dump::core::hooks::ExportHooks;
//! use fauna_dump::domain::CollectionId;
//!
//! struct LowercaseFiles;
//!
//! impl ExportHooks for LowercaseFiles {
//!     fn file_name(&self, collection: &CollectionId) -> String {
//!         collection.as_str().to_lowercase()
//!     }
//! }
//! ```
//!
//! ## Output Format
//!
//! Rows are separated by `\r\n`. Each cell is the JSON text of its value, so
//! strings are quoted and escaped; `null` is written as an empty cell.
//!
//! ## Error Handling
//!
//! All library functions return [`domain::Result`] with [`domain::DumpError`].
//! Only [`domain::DumpError::TransientQuery`] is retried.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
