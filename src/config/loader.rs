//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DumpConfig, FileNameCase};
use crate::config::secret_string;
use crate::domain::errors::DumpError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "fauna-dump.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DumpConfig
/// 4. Applies environment variable overrides (FAUNA_DUMP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DumpError::Configuration`] if the file is missing or unreadable,
/// a referenced environment variable is unset, the TOML is invalid, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use fauna_dump::config::loader::load_config;
///
/// let config = load_config("fauna-dump.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DumpConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DumpError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DumpError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: DumpConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DumpError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DumpError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(DumpError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        DumpError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies environment variable overrides using FAUNA_DUMP_* prefix
///
/// Environment variables follow the pattern: FAUNA_DUMP_<SECTION>_<KEY>
/// For example: FAUNA_DUMP_DATABASE_SECRET, FAUNA_DUMP_EXPORT_PAGE_SIZE
fn apply_env_overrides(config: &mut DumpConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("FAUNA_DUMP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Database overrides
    if let Some(val) = var("FAUNA_DUMP_DATABASE_SECRET") {
        config.database.secret = secret_string(val);
    }
    if let Some(val) = var("FAUNA_DUMP_DATABASE_ENDPOINT") {
        config.database.endpoint = val;
    }
    if let Some(val) = var("FAUNA_DUMP_DATABASE_TIMEOUT_SECONDS") {
        config.database.timeout_seconds = parse_env("FAUNA_DUMP_DATABASE_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("FAUNA_DUMP_DATABASE_RETRY_FOREVER") {
        config.database.retry.forever = parse_env("FAUNA_DUMP_DATABASE_RETRY_FOREVER", &val)?;
    }
    if let Some(val) = var("FAUNA_DUMP_DATABASE_RETRY_MAX_RETRIES") {
        config.database.retry.max_retries =
            parse_env("FAUNA_DUMP_DATABASE_RETRY_MAX_RETRIES", &val)?;
    }

    // Export overrides
    if let Some(val) = var("FAUNA_DUMP_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_COLLECTIONS") {
        config.export.collections = parse_list(&val);
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_PAGE_SIZE") {
        config.export.page_size = parse_env("FAUNA_DUMP_EXPORT_PAGE_SIZE", &val)?;
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_START_POINT_IN_TIME") {
        config.export.start_point_in_time =
            Some(parse_env("FAUNA_DUMP_EXPORT_START_POINT_IN_TIME", &val)?);
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_END_POINT_IN_TIME") {
        config.export.end_point_in_time =
            Some(parse_env("FAUNA_DUMP_EXPORT_END_POINT_IN_TIME", &val)?);
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_INDEX_TEMPLATE") {
        config.export.index_template = Some(val);
    }
    if let Some(val) = var("FAUNA_DUMP_EXPORT_FILE_NAME_CASE") {
        config.export.file_name_case = match val.trim().to_ascii_lowercase().as_str() {
            "preserve" => FileNameCase::Preserve,
            "lower" => FileNameCase::Lower,
            "upper" => FileNameCase::Upper,
            other => {
                return Err(DumpError::Configuration(format!(
                    "Invalid value '{other}' for FAUNA_DUMP_EXPORT_FILE_NAME_CASE"
                )))
            }
        };
    }

    // Logging overrides
    if let Some(val) = var("FAUNA_DUMP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("FAUNA_DUMP_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("FAUNA_DUMP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = var("FAUNA_DUMP_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
