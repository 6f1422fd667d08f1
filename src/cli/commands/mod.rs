//! CLI command implementations
//!
//! Every command returns its process exit code.

pub mod collections;
pub mod export;
pub mod init;
pub mod validate;
