//! Export command implementation
//!
//! This module implements the `export` command, which writes one CSV file
//! per selected collection.

use crate::cli::{fail, split_list, EXIT_SUCCESS};
use crate::config::{load_config, DumpConfig};
use crate::core::export::ExportCoordinator;
use crate::domain::DumpError;
use chrono::{DateTime, Utc};
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override collections to export (comma-separated)
    #[arg(long)]
    pub collections: Option<String>,

    /// Override records per page query
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Export only documents changed after this RFC 3339 instant
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Read the database as of this RFC 3339 instant (default: now)
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Override output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Apply the command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut DumpConfig) {
        if let Some(collections) = &self.collections {
            let names = split_list(collections);
            tracing::info!(collections = ?names, "Overriding collections from CLI");
            config.export.collections = names;
        }
        if let Some(page_size) = self.page_size {
            config.export.page_size = page_size;
        }
        if let Some(start) = self.start {
            config.export.start_point_in_time = Some(start);
        }
        if let Some(end) = self.end {
            config.export.end_point_in_time = Some(end);
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to load configuration", &e)),
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            let error = DumpError::Configuration(e);
            return Ok(fail("Configuration validation failed", &error));
        }

        let coordinator = match ExportCoordinator::from_config(&config) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to initialize export", &e)),
        };

        println!("🚀 Starting export...");
        println!("  Endpoint: {}", config.database.endpoint);
        println!("  Output: {}", coordinator.options().output_dir.display());
        println!(
            "  Mode: {}",
            match coordinator.options().start_time {
                Some(start) => format!("incremental since {}", start.to_rfc3339()),
                None => format!("snapshot at {}", coordinator.options().end_time.to_rfc3339()),
            }
        );
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => return Ok(fail("Export failed", &e)),
        };

        println!("📊 Export Summary:");
        for collection in &summary.collections {
            println!(
                "  {}: {} records in {} pages -> {}",
                collection.collection,
                collection.records,
                collection.pages,
                collection.file.display()
            );
        }
        println!("  Collections: {}", summary.collections.len());
        println!("  Total Records: {}", summary.total_records);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("✅ Export completed successfully!");

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileNameCase;

    #[test]
    fn test_export_args_defaults_leave_config_untouched() {
        let mut config = DumpConfig::default();
        config.export.collections = vec!["User".to_string()];
        ExportArgs::default().apply_overrides(&mut config);

        assert_eq!(config.export.collections, vec!["User"]);
        assert_eq!(config.export.page_size, 1000);
        assert_eq!(config.export.output_dir, "dist");
        assert_eq!(config.export.file_name_case, FileNameCase::Preserve);
    }

    #[test]
    fn test_export_args_with_overrides() {
        let args = ExportArgs {
            collections: Some("User, Order".to_string()),
            page_size: Some(2),
            start: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            end: Some("2024-02-01T00:00:00Z".parse().unwrap()),
            output_dir: Some("out".to_string()),
        };
        let mut config = DumpConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.export.collections, vec!["User", "Order"]);
        assert_eq!(config.export.page_size, 2);
        assert!(config.export.start_point_in_time.is_some());
        assert!(config.export.end_point_in_time.is_some());
        assert_eq!(config.export.output_dir, "out");
    }

    #[tokio::test]
    async fn test_missing_config_is_configuration_exit_code() {
        let code = ExportArgs::default()
            .execute("does-not-exist.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
