//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::EXIT_SUCCESS;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::domain::DumpError;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include per-collection examples and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set FAUNA_SECRET in the environment or a .env file");
                println!("  2. Edit {} with your settings", self.output);
                println!("  3. Validate configuration: fauna-dump validate-config");
                println!("  4. Run export: fauna-dump export");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                let error = DumpError::from(e);
                println!("❌ Failed to write configuration file");
                println!("   Error: {error}");
                Ok(error.exit_code())
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# fauna-dump configuration

[application]
log_level = "info"

[database]
secret = "${FAUNA_SECRET}"
endpoint = "https://db.fauna.com/"
timeout_seconds = 60

[export]
output_dir = "dist"
collections = []
page_size = 1000
"#
        .to_string()
    }

    /// Generate configuration with examples
    fn generate_config_with_examples() -> String {
        r#"# fauna-dump configuration
#
# Values of the form ${VAR} are read from the environment. Any key can also
# be overridden with FAUNA_DUMP_<SECTION>_<KEY>, e.g. FAUNA_DUMP_EXPORT_PAGE_SIZE.

[application]
log_level = "info"  # trace | debug | info | warn | error

[database]
secret = "${FAUNA_SECRET}"
endpoint = "https://db.fauna.com/"
timeout_seconds = 60

# Transient failures (HTTP 429, 5xx, timeouts) are retried with exponential
# backoff. With forever = true, max_retries is ignored.
[database.retry]
forever = true
max_retries = 5
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[export]
output_dir = "dist"
# Empty exports every collection; names match ignoring case
collections = ["User", "Order"]
page_size = 1000

# Read the database as of this instant (default: now)
# end_point_in_time = "2024-06-01T00:00:00Z"

# Setting a start switches to incremental mode: only documents changed after
# this instant are exported, read through an index whose values start with ts
# start_point_in_time = "2024-05-01T00:00:00Z"
index_template = "{collection}_by_ts"

file_name_case = "lower"  # preserve | lower | upper
drop_headers = []
rename_headers = {}

[collection.User]
headers = ["id", "email", "team_name", "inserted_at"]
columns = { inserted_at = "created/@ts" }

[[collection.User.relations]]
name = "team_name"
ref_path = ["data", "team"]
select = ["data", "name"]

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
