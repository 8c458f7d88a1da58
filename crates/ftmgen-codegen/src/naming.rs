//! Java identifier rules

use std::borrow::Cow;

/// Attribute names that collide with Java keywords, and their substitutes
pub const RESERVED_WORDS: &[(&str, &str)] = &[("case", "caze"), ("class", "clazz")];

/// The name an attribute takes in generated source
pub fn field_name(attribute: &str) -> Cow<'_, str> {
    RESERVED_WORDS
        .iter()
        .find(|(reserved, _)| *reserved == attribute)
        .map(|(_, alias)| Cow::Borrowed(*alias))
        .unwrap_or(Cow::Borrowed(attribute))
}

pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
