//! Domain error types
//!
//! This module defines the error hierarchy for fauna-dump. Errors never expose
//! third-party types; adapters translate transport failures into one of the
//! variants below so the retry policy can classify them.

use thiserror::Error;

/// Main fauna-dump error type
///
/// The variants map one-to-one onto the ways a run can fail. Only
/// [`DumpError::TransientQuery`] is retried by the default retry policy.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The query service cannot be reached at all
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// A query failed in a way the service reports as retryable
    #[error("Transient query error: {0}")]
    TransientQuery(String),

    /// A query was rejected (malformed request, authorization, missing index)
    #[error("Query failed: {0}")]
    FatalQuery(String),

    /// Output directory or file could not be created or written
    #[error("Output I/O error: {0}")]
    OutputIo(String),

    /// A caller-supplied hook reported an error
    #[error("Hook error: {0}")]
    Hook(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DumpError {
    /// Whether the error is worth retrying with the same query
    ///
    /// This is the default classification predicate used by
    /// [`crate::core::retry::RetryPolicy`].
    pub fn is_transient(&self) -> bool {
        matches!(self, DumpError::TransientQuery(_))
    }

    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DumpError::Configuration(_) => 2,
            DumpError::Connectivity(_) => 4,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for DumpError {
    fn from(err: std::io::Error) -> Self {
        DumpError::OutputIo(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DumpError {
    fn from(err: serde_json::Error) -> Self {
        DumpError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DumpError {
    fn from(err: toml::de::Error) -> Self {
        DumpError::Configuration(format!("TOML parse error: {err}"))
    }
}
