//! FollowTheMoney schema loading and parsing

pub mod catalog;
pub mod document;
pub mod error;
pub mod loader;

#[cfg(feature = "native")]
pub mod fetch;

pub use catalog::{closed_set, SchemaCatalog};
pub use document::{parse_document, parse_value, SchemaDocument, ENTITY_TYPE};
pub use error::ParserError;
pub use loader::{is_schema_file, load_dir};

#[cfg(feature = "native")]
pub use fetch::{ListingEntry, SchemaFetcher, DEFAULT_SCHEMA_URL};
