//! Mapping of schema property types to Java types

use std::collections::BTreeSet;

use ftmgen_core::{PropertyDescriptor, PropertyType};
use tracing::debug;

/// Type used whenever nothing better is known
pub const FALLBACK_TYPE: &str = "String";

/// Scalar tags with a dedicated Java type: (tag, type, import)
const SCALAR_TYPES: &[(&str, &str, Option<&str>)] = &[
    ("number", "int", None),
    ("url", "URL", Some("java.net.URL")),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    pub name: String,
    pub import: Option<&'static str>,
}

impl JavaType {
    fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import: None,
        }
    }

    pub fn fallback() -> Self {
        Self::plain(FALLBACK_TYPE)
    }
}

/// Java type for a scalar tag. Unknown or missing tags are text.
pub fn scalar_type(tag: Option<&str>) -> JavaType {
    tag.and_then(|tag| SCALAR_TYPES.iter().find(|(known, _, _)| *known == tag))
        .map(|(_, name, import)| JavaType {
            name: (*name).to_string(),
            import: *import,
        })
        .unwrap_or_else(JavaType::fallback)
}

/// Java type for a property.
///
/// `models` is the run's list of known type names. When given, entity
/// references to types outside it fall back to text; when absent every
/// named range is trusted.
pub fn java_type(
    attribute: &str,
    property: Option<&PropertyDescriptor>,
    models: Option<&BTreeSet<String>>,
) -> JavaType {
    let Some(property) = property else {
        debug!("No declaration found for {}, using {}", attribute, FALLBACK_TYPE);
        return JavaType::fallback();
    };

    match &property.ty {
        PropertyType::Scalar { tag } => scalar_type(tag.as_deref()),
        PropertyType::EntityReference { range: Some(range) } => match models {
            Some(models) if !models.contains(range) => {
                debug!(
                    "{} references unknown type {}, using {}",
                    attribute, range, FALLBACK_TYPE
                );
                JavaType::fallback()
            }
            _ => JavaType::plain(range.clone()),
        },
        PropertyType::EntityReference { range: None } => {
            debug!("{} has no entity range, using {}", attribute, FALLBACK_TYPE);
            JavaType::fallback()
        }
    }
}
