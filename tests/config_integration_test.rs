//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use fauna_dump::config::{load_config, FileNameCase};
use fauna_dump::core::export::ExportOptions;
use fauna_dump::core::hooks::{ConfigHooks, ExportHooks};
use fauna_dump::domain::{CollectionId, DumpError};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FAUNA_DUMP_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FAUNA_DUMP_DATABASE_SECRET");
    std::env::remove_var("FAUNA_DUMP_EXPORT_PAGE_SIZE");
    std::env::remove_var("FAUNA_DUMP_EXPORT_COLLECTIONS");
    std::env::remove_var("FAUNA_DUMP_EXPORT_FILE_NAME_CASE");
    std::env::remove_var("TEST_FAUNA_SECRET");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[database]
secret = "fnAE-complete"
endpoint = "https://db.us.fauna.com/"
timeout_seconds = 30

[database.retry]
forever = false
max_retries = 3
initial_delay_ms = 250
max_delay_ms = 4000
backoff_multiplier = 3.0

[export]
output_dir = "out"
collections = ["User", "Order"]
page_size = 500
start_point_in_time = "2024-05-01T00:00:00Z"
end_point_in_time = "2024-06-01T00:00:00Z"
index_template = "{collection}_by_ts"
file_name_case = "upper"
drop_headers = ["password"]
rename_headers = { inserted_at = "created" }

[collection.User]
headers = ["id", "email", "team_name"]
file_name = "people"
index = "users_changed"

[[collection.User.relations]]
name = "team_name"
ref_path = ["data", "team"]
select = ["data", "name"]

[logging]
local_enabled = true
local_path = "/tmp/fauna-dump"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.database.secret.expose_secret().to_string(), "fnAE-complete");
    assert_eq!(config.database.endpoint, "https://db.us.fauna.com/");
    assert_eq!(config.database.timeout_seconds, 30);
    assert!(!config.database.retry.forever);
    assert_eq!(config.database.retry.max_retries, 3);

    assert_eq!(config.export.output_dir, "out");
    assert_eq!(config.export.collections, vec!["User", "Order"]);
    assert_eq!(config.export.page_size, 500);
    assert_eq!(config.export.file_name_case, FileNameCase::Upper);
    assert_eq!(config.export.rename_headers["inserted_at"], "created");

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    // Overrides flow through to the hooks
    let hooks = ConfigHooks::from_config(&config);
    let user = CollectionId::new("User").unwrap();
    let order = CollectionId::new("Order").unwrap();
    assert_eq!(hooks.file_name(&user), "people");
    assert_eq!(hooks.file_name(&order), "ORDER");
    assert_eq!(hooks.collection_index(&user), Some("users_changed".to_string()));
    assert_eq!(hooks.collection_index(&order), Some("Order_by_ts".to_string()));
    assert_eq!(hooks.record_shape(&user).relations.len(), 1);
    assert!(hooks.record_shape(&order).relations.is_empty());
    assert_eq!(hooks.transform_header("password"), None);
    assert_eq!(hooks.transform_header("inserted_at"), Some("created".to_string()));

    let options = ExportOptions::from_config(&config);
    assert_eq!(options.page_size, 500);
    assert!(options.start_time.is_some());
    assert!(!options.retry.forever);
    assert_eq!(options.retry.max_retries, 3);
    options.validate().unwrap();
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[database]
secret = "fnAE-minimal"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.database.endpoint, "https://db.fauna.com/");
    assert!(config.database.retry.forever);
    assert_eq!(config.database.retry.initial_delay_ms, 1000);
    assert_eq!(config.database.retry.max_delay_ms, 30000);
    assert_eq!(config.export.output_dir, "dist");
    assert!(config.export.collections.is_empty());
    assert_eq!(config.export.page_size, 1000);
    assert_eq!(config.export.start_point_in_time, None);
    assert_eq!(config.export.file_name_case, FileNameCase::Preserve);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FAUNA_SECRET", "fnAE-from-env");

    let temp_file = write_config(
        r#"
[database]
secret = "${TEST_FAUNA_SECRET}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.database.secret.expose_secret().to_string(), "fnAE-from-env");

    std::env::remove_var("TEST_FAUNA_SECRET");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(matches!(err, DumpError::Configuration(_)));
    assert!(err.to_string().contains("TEST_FAUNA_SECRET"));

    cleanup_env_vars();
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[database]
secret = "fnAE-file"

[export]
page_size = 100
"#,
    );

    std::env::set_var("FAUNA_DUMP_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("FAUNA_DUMP_DATABASE_SECRET", "fnAE-override");
    std::env::set_var("FAUNA_DUMP_EXPORT_PAGE_SIZE", "250");
    std::env::set_var("FAUNA_DUMP_EXPORT_COLLECTIONS", "User, Order");
    std::env::set_var("FAUNA_DUMP_EXPORT_FILE_NAME_CASE", "lower");

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.database.secret.expose_secret().to_string(), "fnAE-override");
    assert_eq!(config.export.page_size, 250);
    assert_eq!(config.export.collections, vec!["User", "Order"]);
    assert_eq!(config.export.file_name_case, FileNameCase::Lower);

    std::env::set_var("FAUNA_DUMP_EXPORT_PAGE_SIZE", "lots");
    assert!(matches!(
        load_config(temp_file.path()),
        Err(DumpError::Configuration(_))
    ));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let invalid = [
        // Missing secret
        "[database]\nsecret = \"\"\n",
        // Bad endpoint scheme
        "[database]\nsecret = \"s\"\nendpoint = \"ftp://db.fauna.com\"\n",
        // Page size out of range
        "[database]\nsecret = \"s\"\n[export]\npage_size = 0\n",
        // Inverted time range
        "[database]\nsecret = \"s\"\n[export]\nstart_point_in_time = \"2024-06-01T00:00:00Z\"\nend_point_in_time = \"2024-05-01T00:00:00Z\"\n",
        // Unknown log level
        "[application]\nlog_level = \"verbose\"\n[database]\nsecret = \"s\"\n",
        // Unknown rotation
        "[database]\nsecret = \"s\"\n[logging]\nlocal_rotation = \"size\"\n",
    ];

    for contents in invalid {
        let temp_file = write_config(contents);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            matches!(err, DumpError::Configuration(_)),
            "expected configuration error for:\n{contents}"
        );
        assert_eq!(err.exit_code(), 2);
    }
}
