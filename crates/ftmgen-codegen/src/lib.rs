//! Source generation for FollowTheMoney schema models

pub mod error;
pub mod imports;
pub mod java;
pub mod naming;
pub mod type_map;

use ftmgen_core::SchemaModel;

pub use error::CodegenError;
pub use java::{GeneratedSource, GeneratorOptions, JavaCodegen, Shape};

/// Common trait for source generators
pub trait Codegen {
    fn generate(&self, model: &SchemaModel) -> Result<String, CodegenError>;
}
