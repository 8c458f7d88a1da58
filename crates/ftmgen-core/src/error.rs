use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A supertype chain loops back on itself. `path` lists the names along
    /// the loop, starting and ending with the same type.
    #[error("Inheritance cycle detected: {}", path.join(" -> "))]
    InheritanceCycle { path: Vec<String> },

    #[error("Invalid attribute mode: {0} (expected required, featured or full)")]
    InvalidAttributeMode(String),
}
