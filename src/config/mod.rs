//! Configuration management for fauna-dump.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! fauna-dump uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FAUNA_DUMP_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fauna_dump::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fauna-dump.toml")?;
//!
//! println!("Endpoint: {}", config.database.endpoint);
//! println!("Output: {}", config.export.output_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`DatabaseConfig`] - Fauna endpoint, secret, timeout and retry policy
//! - [`ExportConfig`] - Collections, page size, time range, naming
//! - [`CollectionOverrides`] - Per-collection headers, columns, index, relations
//! - [`LoggingConfig`] - Optional rolling JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [database]
//! secret = "${FAUNA_SECRET}"
//!
//! [export]
//! output_dir = "dist"
//! collections = ["User"]
//! page_size = 1000
//!
//! [collection.User]
//! headers = ["id", "email", "inserted_at"]
//! columns = { inserted_at = "created/@ts" }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, CollectionOverrides, DatabaseConfig, DumpConfig, ExportConfig,
    FileNameCase, LoggingConfig, RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
