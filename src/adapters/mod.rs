//! External system integrations for fauna-dump.
//!
//! - [`service`] - The [`QueryService`](service::QueryService) trait the
//!   export pipeline is written against
//! - [`fauna`] - Fauna HTTP implementation of that trait
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the database transport
//! and enable testing with in-memory implementations.
//!
//! ```rust,no_run
//! use fauna_dump::adapters::fauna::FaunaClient;
//! use fauna_dump::adapters::service::QueryService;
//! use fauna_dump::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fauna-dump.toml")?;
//! let client = FaunaClient::new(&config.database)?;
//! for collection in client.list_collections().await? {
//!     println!("{}", collection.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod fauna;
pub mod service;
