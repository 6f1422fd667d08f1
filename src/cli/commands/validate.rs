//! Validate config command implementation

use crate::cli::{fail, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded configuration is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Configuration is invalid", &e)),
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Endpoint: {}", config.database.endpoint);
        println!("  Timeout: {}s", config.database.timeout_seconds);
        println!(
            "  Retry: {}",
            if config.database.retry.forever {
                "forever".to_string()
            } else {
                format!("up to {} times", config.database.retry.max_retries)
            }
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!(
            "  Collections: {}",
            if config.export.collections.is_empty() {
                "All".to_string()
            } else {
                config.export.collections.join(", ")
            }
        );
        println!("  Page Size: {}", config.export.page_size);
        if let Some(start) = config.export.start_point_in_time {
            println!("  Incremental Since: {}", start.to_rfc3339());
        }
        if !config.collection.is_empty() {
            let mut names: Vec<&String> = config.collection.keys().collect();
            names.sort();
            println!(
                "  Collection Overrides: {}",
                names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", ")
            );
        }
        println!();

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[database]\nsecret = \"fnAE-test\"\n").unwrap();

        let code = ValidateArgs::default()
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[database]\nsecret = \"\"\n").unwrap();

        let code = ValidateArgs::default()
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
