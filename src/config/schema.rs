//! Configuration schema types
//!
//! This module defines the configuration structure for fauna-dump.

use crate::config::{secret_string, SecretString};
use crate::domain::{RecordShape, RelationSpec};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest page size Fauna accepts
pub const MAX_PAGE_SIZE: usize = 100_000;

/// Main fauna-dump configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Fauna connection settings
    pub database: DatabaseConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Per-collection overrides, keyed by collection name
    #[serde(default)]
    pub collection: HashMap<String, CollectionOverrides>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DumpConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.database.validate()?;
        self.export.validate()?;
        for (name, overrides) in &self.collection {
            overrides
                .validate()
                .map_err(|e| format!("collection.{name}: {e}"))?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for page queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retry transient failures without limit
    #[serde(default = "default_true")]
    pub forever: bool,

    /// Maximum number of retry attempts when `forever` is off
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "database.retry.backoff_multiplier must be at least 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "database.retry.initial_delay_ms ({}) cannot exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            forever: true,
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Fauna connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database access secret
    /// Stored securely in memory and automatically zeroized on drop
    pub secret: SecretString,

    /// Query endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.secret.expose_secret().is_empty() {
            return Err("database.secret cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid database.endpoint '{}': {e}", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "database.endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("database.timeout_seconds must be greater than 0".to_string());
        }

        self.retry.validate()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            secret: secret_string(String::new()),
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Case applied to output file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileNameCase {
    /// Keep the collection name as is
    #[default]
    Preserve,
    /// Lowercase the collection name
    Lower,
    /// Uppercase the collection name
    Upper,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving one CSV file per collection
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Collections to export; empty exports all
    #[serde(default)]
    pub collections: Vec<String>,

    /// Records per page query
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Exclusive lower bound; setting it selects incremental mode
    #[serde(default)]
    pub start_point_in_time: Option<DateTime<Utc>>,

    /// Snapshot instant; defaults to the start of the run
    #[serde(default)]
    pub end_point_in_time: Option<DateTime<Utc>>,

    /// Index name for incremental reads, `{collection}` is replaced by the
    /// collection name
    #[serde(default)]
    pub index_template: Option<String>,

    /// Case applied to output file names
    #[serde(default)]
    pub file_name_case: FileNameCase,

    /// Inferred headers to leave out
    #[serde(default)]
    pub drop_headers: Vec<String>,

    /// Inferred headers to rename, old name to new name
    #[serde(default)]
    pub rename_headers: HashMap<String, String>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "export.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if let (Some(start), Some(end)) = (self.start_point_in_time, self.end_point_in_time) {
            if start > end {
                return Err(format!(
                    "export.start_point_in_time ({}) is after end_point_in_time ({})",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                ));
            }
        }

        if self.collections.iter().any(|c| c.trim().is_empty()) {
            return Err("export.collections cannot contain empty names".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            collections: Vec::new(),
            page_size: default_page_size(),
            start_point_in_time: None,
            end_point_in_time: None,
            index_template: None,
            file_name_case: FileNameCase::default(),
            drop_headers: Vec::new(),
            rename_headers: HashMap::new(),
        }
    }
}

/// Per-collection overrides from a `[collection.<Name>]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionOverrides {
    /// Explicit column list, replaces header inference
    #[serde(default)]
    pub headers: Option<Vec<String>>,

    /// Column name to `/`-separated source path in the flattened row
    #[serde(default)]
    pub columns: HashMap<String, String>,

    /// Index used for incremental reads, overrides `export.index_template`
    #[serde(default)]
    pub index: Option<String>,

    /// Output file name without `.csv`
    #[serde(default)]
    pub file_name: Option<String>,

    /// Derived fields to compute per document
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
}

impl CollectionOverrides {
    fn validate(&self) -> Result<(), String> {
        if matches!(&self.file_name, Some(name) if name.trim().is_empty()) {
            return Err("file_name cannot be empty".to_string());
        }
        RecordShape {
            relations: self.relations.clone(),
        }
        .validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://db.fauna.com/".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> usize {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_page_size() -> usize {
    1000
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
