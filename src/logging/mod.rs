//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an
//! optional rolling JSON file.
//!
//! # Example
//!
//! ```no_run
//! use fauna_dump::logging::init_logging;
//! use fauna_dump::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(collection = "User", "Exporting collection");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
