//! The full list of schemas of a run, and the closed parent set built from it

use std::collections::BTreeSet;

use ftmgen_core::{NodeSet, SchemaNode, DEFAULT_MIXINS};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{ParserError, SchemaDocument};

/// Every schema node known to a generation run, keyed by type name
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    nodes: IndexMap<String, SchemaNode>,
}

impl SchemaCatalog {
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        let mut catalog = Self::default();
        for node in nodes {
            catalog.insert(node);
        }
        catalog
    }

    /// Parse every document. The first malformed document aborts the run.
    pub fn from_documents(documents: &[SchemaDocument]) -> Result<Self, ParserError> {
        let mut catalog = Self::default();
        for document in documents {
            catalog.insert(document.parse()?);
        }
        info!("Parsed {} schema definitions", catalog.len());
        Ok(catalog)
    }

    pub fn insert(&mut self, node: SchemaNode) {
        if let Some(previous) = self.nodes.insert(node.name.clone(), node) {
            warn!("Schema {} is defined twice, keeping the last one", previous.name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of every known type (the run's model list)
    pub fn names(&self) -> BTreeSet<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Names that appear in at least one `extends` list
    pub fn parent_names(&self) -> BTreeSet<String> {
        self.nodes
            .values()
            .flat_map(|node| node.extends.iter().cloned())
            .collect()
    }

    /// Closed set of parents with the default mixins
    pub fn closed_set(&self) -> Result<NodeSet, ParserError> {
        closed_set(self.nodes.values(), DEFAULT_MIXINS.iter().copied())
    }

    pub fn closed_set_with_mixins<M, S>(&self, mixins: M) -> Result<NodeSet, ParserError>
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        closed_set(self.nodes.values(), mixins)
    }
}

/// Keep every node referenced as a supertype by some node, and freeze them.
pub fn closed_set<'a, I, M, S>(nodes: I, mixins: M) -> Result<NodeSet, ParserError>
where
    I: IntoIterator<Item = &'a SchemaNode>,
    M: IntoIterator<Item = S>,
    S: Into<String>,
{
    let nodes: Vec<&SchemaNode> = nodes.into_iter().collect();
    let parents: BTreeSet<&str> = nodes
        .iter()
        .copied()
        .flat_map(|node| node.extends.iter().map(String::as_str))
        .collect();

    for missing in parents
        .iter()
        .filter(|name| !nodes.iter().any(|node| node.name == **name))
    {
        debug!("Supertype {} has no definition in this run", missing);
    }

    let members = nodes
        .into_iter()
        .filter(|node| parents.contains(node.name.as_str()))
        .cloned();
    Ok(NodeSet::with_mixins(members, mixins)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftmgen_core::CoreError;
    use pretty_assertions::assert_eq;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::new([
            SchemaNode::new("Interval"),
            SchemaNode::new("Thing").with_required(["name"]),
            SchemaNode::new("CallForTenders")
                .with_extends(["Thing", "Interval"])
                .with_required(["title"]),
        ])
    }

    #[test]
    fn test_find_parents() -> Result<(), ParserError> {
        let set = catalog().closed_set()?;
        assert_eq!(set.len(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Interval", "Thing"]);
        assert!(!set.contains("CallForTenders"));
        Ok(())
    }

    #[test]
    fn test_names() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.names().contains("CallForTenders"));
        assert_eq!(
            catalog.parent_names().into_iter().collect::<Vec<_>>(),
            vec!["Interval", "Thing"]
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let catalog = SchemaCatalog::new([
            SchemaNode::new("A").with_extends(["B"]),
            SchemaNode::new("B").with_extends(["A"]),
        ]);
        assert!(matches!(
            catalog.closed_set(),
            Err(ParserError::Core(CoreError::InheritanceCycle { .. }))
        ));
    }

    #[test]
    fn test_duplicate_definition_keeps_last() {
        let catalog = SchemaCatalog::new([
            SchemaNode::new("Thing"),
            SchemaNode::new("Thing").with_required(["name"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("Thing").map(|n| n.required.clone()),
            Some(vec!["name".to_string()])
        );
    }
}
