//! FollowTheMoney YAML documents
//!
//! Each document is a mapping with exactly one key, the type name:
//!
//! ```yaml
//! CallForTenders:
//!   label: Call for tenders
//!   extends:
//!     - Thing
//!     - Interval
//!   required:
//!     - title
//!     - authority
//!   properties:
//!     authority:
//!       type: entity
//!       range: LegalEntity
//! ```

use ftmgen_core::{PropertyDescriptor, PropertyType, SchemaNode};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::ParserError;

/// Property type tag that marks a reference to another schema
pub const ENTITY_TYPE: &str = "entity";

/// Raw text of one schema file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    pub file_name: String,
    pub content: String,
}

impl SchemaDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn parse(&self) -> Result<SchemaNode, ParserError> {
        parse_named(&self.file_name, &self.content)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDefinition {
    label: Option<String>,
    description: Option<String>,
    #[serde(rename = "abstract")]
    is_abstract: bool,
    extends: Vec<String>,
    required: Vec<String>,
    featured: Vec<String>,
    properties: IndexMap<String, Option<RawProperty>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProperty {
    label: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    range: Option<String>,
    reverse: Option<RawReverse>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReverse {
    Name(String),
    Detail { name: String },
}

impl RawProperty {
    fn into_descriptor(self) -> PropertyDescriptor {
        let ty = match self.ty.as_deref() {
            Some(ENTITY_TYPE) => PropertyType::EntityReference { range: self.range },
            _ => PropertyType::Scalar { tag: self.ty },
        };
        PropertyDescriptor {
            ty,
            label: self.label,
            description: self.description,
            reverse: self.reverse.map(|reverse| match reverse {
                RawReverse::Name(name) | RawReverse::Detail { name } => name,
            }),
        }
    }
}

/// Parse one YAML document into a schema node
pub fn parse_document(text: &str) -> Result<SchemaNode, ParserError> {
    parse_named("<inline>", text)
}

fn parse_named(document: &str, text: &str) -> Result<SchemaNode, ParserError> {
    let value: Value = serde_yaml::from_str(text)?;
    parse_value(document, value)
}

/// Build a schema node from an already parsed YAML structure.
///
/// The root mapping must hold exactly one definition.
pub fn parse_value(document: &str, value: Value) -> Result<SchemaNode, ParserError> {
    let root: IndexMap<String, Value> = match value {
        Value::Null => IndexMap::new(),
        other => serde_yaml::from_value(other)?,
    };
    if root.len() != 1 {
        return Err(ParserError::Structural {
            document: document.to_string(),
            found: root.into_keys().collect(),
        });
    }

    let Some((name, body)) = root.into_iter().next() else {
        return Err(ParserError::InvalidSchema(format!("{document}: empty document")));
    };
    let raw: RawDefinition = match body {
        Value::Null => RawDefinition::default(),
        other => serde_yaml::from_value(other)?,
    };

    let mut node = SchemaNode::new(name)
        .with_required(raw.required)
        .with_featured(raw.featured)
        .with_extends(raw.extends)
        .with_abstract(raw.is_abstract);
    node.label = raw.label;
    node.description = raw.description;
    for (property, raw) in raw.properties {
        node.properties
            .insert(property, raw.unwrap_or_default().into_descriptor());
    }

    tracing::trace!(
        "Parsed {} from {}: {} properties, extends {:?}",
        node.name,
        document,
        node.properties.len(),
        node.extends
    );
    Ok(node)
}
