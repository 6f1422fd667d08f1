//! Collections command implementation
//!
//! Lists every collection in the database and marks the ones the current
//! configuration would export.

use crate::adapters::fauna::FaunaClient;
use crate::cli::{fail, EXIT_SUCCESS};
use crate::config::load_config;
use crate::core::export::enumerator::{list_collections, select_collections};
use clap::Args;

/// Arguments for the collections command
#[derive(Args, Debug, Default)]
pub struct CollectionsArgs {}

impl CollectionsArgs {
    /// Execute the collections command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to load configuration", &e)),
        };

        let client = match FaunaClient::new(&config.database) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to create client", &e)),
        };

        let all = match list_collections(&client).await {
            Ok(all) => all,
            Err(e) => return Ok(fail("Failed to list collections", &e)),
        };

        let selected = select_collections(all.clone(), &config.export.collections);
        for collection in &all {
            let marker = if selected.iter().any(|s| s.id == collection.id) {
                "✓"
            } else {
                " "
            };
            println!("  [{marker}] {}", collection.id);
        }
        println!();
        println!("{} of {} collections selected", selected.len(), all.len());

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_configuration_exit_code() {
        let code = CollectionsArgs::default()
            .execute("does-not-exist.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
