//! Schema model and inheritance resolution for ftmgen
//!
//! Collapses the multiple inheritance of FollowTheMoney-style schemas onto a
//! single concrete parent per type, plus a list of capability interfaces.

pub mod error;
pub mod model;
pub mod node;
pub mod node_set;

pub use error::CoreError;
pub use model::SchemaModel;
pub use node::{AttributeMode, PropertyDescriptor, PropertyType, SchemaNode};
pub use node_set::{NodeSet, Resolution, DEFAULT_MIXINS};
