//! Domain models and types for fauna-dump.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`CollectionId`], [`Cursor`])
//! - **Data model** ([`Collection`], [`Page`], [`Record`], [`Row`])
//! - **Record shape** ([`RecordShape`], [`RelationSpec`])
//! - **Error types** ([`DumpError`]) and the [`Result`] alias
//!
//! # Flattening
//!
//! ```rust
//! use fauna_dump::domain::Record;
//! use serde_json::json;
//!
//! let data = json!({"name": "Ada"}).as_object().cloned().unwrap();
//! let row = Record::new("101", data).flatten();
//! assert_eq!(row["id"], json!("101"));
//! assert_eq!(row["name"], json!("Ada"));
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod shape;

pub use errors::DumpError;
pub use ids::{CollectionId, Cursor};
pub use record::{Collection, Page, Record, Row};
pub use result::Result;
pub use shape::{RecordShape, RelationSpec};
