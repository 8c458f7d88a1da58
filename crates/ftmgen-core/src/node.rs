//! Schema nodes: one named entity type and its declared properties

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// How much of a node's property set becomes generated attributes.
///
/// Fixed for a whole generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AttributeMode {
    /// Required properties only
    #[default]
    Required,
    /// Required, then featured properties
    Featured,
    /// Required, featured, then every remaining declared property
    Full,
}

impl FromStr for AttributeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "featured" => Ok(Self::Featured),
            "full" => Ok(Self::Full),
            _ => Err(CoreError::InvalidAttributeMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for AttributeMode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AttributeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeMode::Required => write!(f, "REQUIRED"),
            AttributeMode::Featured => write!(f, "FEATURED"),
            AttributeMode::Full => write!(f, "FULL"),
        }
    }
}

/// Value type of a declared property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyType {
    /// Points at another schema type. `range` is absent when the schema
    /// forgot to name the target.
    EntityReference { range: Option<String> },
    /// Primitive value classified by a free-form tag ("name", "number", "url"...)
    Scalar { tag: Option<String> },
}

/// One declared property of a schema node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub ty: PropertyType,
    pub label: Option<String>,
    pub description: Option<String>,
    /// Name of the back-reference property on the referenced type
    pub reverse: Option<String>,
}

impl PropertyDescriptor {
    pub fn scalar(tag: impl Into<String>) -> Self {
        Self::with_type(PropertyType::Scalar {
            tag: Some(tag.into()),
        })
    }

    /// Scalar property with no type tag at all
    pub fn untyped() -> Self {
        Self::with_type(PropertyType::Scalar { tag: None })
    }

    pub fn entity(range: impl Into<String>) -> Self {
        Self::with_type(PropertyType::EntityReference {
            range: Some(range.into()),
        })
    }

    pub fn with_type(ty: PropertyType) -> Self {
        Self {
            ty,
            label: None,
            description: None,
            reverse: None,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.ty, PropertyType::EntityReference { .. })
    }

    /// The raw type name as written in the schema: the range for entity
    /// references, the tag for scalars.
    pub fn type_name(&self) -> Option<&str> {
        match &self.ty {
            PropertyType::EntityReference { range } => range.as_deref(),
            PropertyType::Scalar { tag } => tag.as_deref(),
        }
    }
}

/// A named entity-type definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    /// The schema author's abstract flag. Independent of structural concreteness.
    pub is_abstract: bool,
    pub required: Vec<String>,
    pub featured: Vec<String>,
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Declared supertypes, in declaration order
    pub extends: Vec<String>,
}

impl SchemaNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = dedup(names);
        self
    }

    pub fn with_featured<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.featured = dedup(names);
        self
    }

    pub fn with_extends<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extends = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, property: PropertyDescriptor) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Own attribute names for the given mode, deduplicated, required first.
    pub fn attributes(&self, mode: AttributeMode) -> Vec<String> {
        let mut attributes: IndexSet<&str> = self.required.iter().map(String::as_str).collect();
        if matches!(mode, AttributeMode::Featured | AttributeMode::Full) {
            attributes.extend(self.featured.iter().map(String::as_str));
        }
        if mode == AttributeMode::Full {
            attributes.extend(self.properties.keys().map(String::as_str));
        }
        attributes.into_iter().map(str::to_string).collect()
    }
}

fn dedup<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let unique: IndexSet<String> = names.into_iter().map(Into::into).collect();
    unique.into_iter().collect()
}
