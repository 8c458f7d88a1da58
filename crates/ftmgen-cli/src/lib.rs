//! Library interface for the ftmgen command-line tool

pub mod config;
pub mod generate;

pub use config::Config;
pub use generate::{generate_catalog, load_documents, write_sources, SchemaSource};
