use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Invalid Java identifier for {context}: {name:?}")]
    InvalidIdentifier { context: String, name: String },

    #[error("{type_name} has two attributes named {name:?} after renaming")]
    DuplicateField { type_name: String, name: String },

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
