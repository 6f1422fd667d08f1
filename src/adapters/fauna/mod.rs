//! FaunaDB adapter implementation
//!
//! This module provides the integration with Fauna: query construction in the
//! FQL v4 wire encoding, response decoding, and the HTTP client.

pub mod client;
pub mod query;
pub mod wire;

pub use client::FaunaClient;
