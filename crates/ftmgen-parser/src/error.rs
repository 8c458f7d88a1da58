use ftmgen_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{document}: schema document should contain one definition, found {found:?}")]
    Structural { document: String, found: Vec<String> },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} while fetching {url}")]
    Http { url: String, status: u16 },

    #[error(transparent)]
    Core(#[from] CoreError),
}
