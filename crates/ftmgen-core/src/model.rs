//! Structural and attribute queries about one schema node
//!
//! A `SchemaModel` pairs a [`SchemaNode`] with the shared [`NodeSet`] of all
//! known supertypes. It answers:
//! - whether the node can hold state (`is_concrete`)
//! - which single supertype carries the inheritance (`concrete_parent`)
//! - which attributes it owns and which it inherits
//! - where a property is declared along the concrete ancestor chain

use indexmap::IndexSet;
use std::sync::Arc;

use crate::node_set::{NodeSet, Resolution};
use crate::{AttributeMode, PropertyDescriptor, SchemaNode};

#[derive(Debug, Clone)]
pub struct SchemaModel {
    node: SchemaNode,
    parents: Arc<NodeSet>,
    mode: AttributeMode,
    resolution: Resolution,
}

impl SchemaModel {
    pub fn new(node: SchemaNode, parents: Arc<NodeSet>, mode: AttributeMode) -> Self {
        // Members were resolved when the set was frozen
        let cached = match parents.get(&node.name) {
            Some(member) if *member == node => parents.resolution(&node.name).cloned(),
            _ => None,
        };
        let resolution = cached.unwrap_or_else(|| parents.resolve(&node));
        Self {
            node,
            parents,
            mode,
            resolution,
        }
    }

    /// A model resolved against an empty node set, as when generating one
    /// schema in isolation.
    pub fn standalone(node: SchemaNode, mode: AttributeMode) -> Self {
        Self::new(node, Arc::new(NodeSet::empty()), mode)
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn node(&self) -> &SchemaNode {
        &self.node
    }

    pub fn parents(&self) -> &NodeSet {
        &self.parents
    }

    pub fn mode(&self) -> AttributeMode {
        self.mode
    }

    /// The schema author's abstract flag
    pub fn is_abstract(&self) -> bool {
        self.node.is_abstract
    }

    /// Whether the node can be materialized as a field-holding type.
    ///
    /// False for mixins, and for nodes that declare no required attribute
    /// and have no concrete ancestor.
    pub fn is_concrete(&self) -> bool {
        self.resolution.concrete
    }

    /// Whether some other node of the run extends this one
    pub fn is_registered_parent(&self) -> bool {
        self.parents.contains(&self.node.name)
    }

    /// The single supertype chosen to carry the inheritance relationship
    pub fn concrete_parent(&self) -> Option<&str> {
        self.resolution.concrete_parent.as_deref()
    }

    /// Declared supertypes that are not concrete: capabilities rather than
    /// state-holding ancestors.
    pub fn implements_list(&self) -> Vec<&str> {
        self.node
            .extends
            .iter()
            .filter(|name| !self.parents.is_concrete_supertype(name))
            .map(String::as_str)
            .collect()
    }

    /// Own attributes for the active mode
    pub fn attributes(&self) -> Vec<String> {
        self.node.attributes(self.mode)
    }

    /// Concrete ancestors from the root down to the immediate parent
    pub fn ancestors(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.concrete_parent();
        while let Some(name) = current {
            if chain.contains(&name) || name == self.node.name {
                break;
            }
            chain.push(name);
            current = self
                .parents
                .resolution(name)
                .and_then(|r| r.concrete_parent.as_deref());
        }
        chain.reverse();
        chain
    }

    /// Attributes of every concrete ancestor, root first, without repeats.
    ///
    /// This is the argument list handed to the supertype constructor.
    pub fn parents_attributes(&self) -> Vec<String> {
        let mut attributes: IndexSet<String> = IndexSet::new();
        for ancestor in self.ancestors() {
            if let Some(node) = self.parents.get(ancestor) {
                attributes.extend(node.attributes(self.mode));
            }
        }
        attributes.into_iter().collect()
    }

    /// Own attributes not already provided by an ancestor
    pub fn own_attributes(&self) -> Vec<String> {
        let inherited = self.parents_attributes();
        self.attributes()
            .into_iter()
            .filter(|a| !inherited.contains(a))
            .collect()
    }

    /// Find the declaration of `property`, first on the node itself, then
    /// along the concrete ancestor chain (immediate parent first).
    ///
    /// Properties declared only on non-concrete supertypes are not found.
    pub fn resolved_property(&self, property: &str) -> Option<&PropertyDescriptor> {
        if let Some(found) = self.node.property(property) {
            return Some(found);
        }
        self.ancestors()
            .into_iter()
            .rev()
            .filter_map(|name| self.parents.get(name))
            .find_map(|node| node.property(property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use pretty_assertions::assert_eq;

    fn thing() -> SchemaNode {
        SchemaNode::new("Thing")
            .with_required(["name"])
            .with_featured(["country"])
            .with_property("name", PropertyDescriptor::scalar("name"))
            .with_property("country", PropertyDescriptor::scalar("country"))
    }

    fn interval() -> SchemaNode {
        SchemaNode::new("Interval")
            .with_featured(["startDate"])
            .with_property("startDate", PropertyDescriptor::scalar("date"))
    }

    fn call_for_tenders() -> SchemaNode {
        SchemaNode::new("CallForTenders")
            .with_extends(["Thing", "Interval"])
            .with_required(["title", "authority"])
            .with_property("title", PropertyDescriptor::untyped())
            .with_property("authority", PropertyDescriptor::entity("LegalEntity"))
    }

    fn model(node: SchemaNode, set: NodeSet) -> SchemaModel {
        SchemaModel::new(node, Arc::new(set), AttributeMode::Required)
    }

    #[test]
    fn test_root_with_required_is_concrete_without_parent() {
        let model = SchemaModel::standalone(thing(), AttributeMode::Required);
        assert!(model.is_concrete());
        assert_eq!(model.concrete_parent(), None);
        assert!(model.implements_list().is_empty());
    }

    #[test]
    fn test_root_without_required_is_not_concrete() {
        let model = SchemaModel::standalone(interval(), AttributeMode::Full);
        assert!(!model.is_concrete());
    }

    #[test]
    fn test_mixin_is_never_concrete() -> Result<(), CoreError> {
        let asset = SchemaNode::new("Asset")
            .with_required(["amount"])
            .with_extends(["Thing"]);
        let model = model(asset, NodeSet::new([thing()])?);
        assert!(!model.is_concrete());
        assert_eq!(model.concrete_parent(), Some("Thing"));
        Ok(())
    }

    #[test]
    fn test_concrete_parent_and_implements() -> Result<(), CoreError> {
        let model = model(call_for_tenders(), NodeSet::new([thing(), interval()])?);
        assert!(model.is_concrete());
        assert_eq!(model.concrete_parent(), Some("Thing"));
        assert_eq!(model.implements_list(), vec!["Interval"]);
        assert_eq!(model.parents_attributes(), vec!["name"]);
        assert_eq!(model.own_attributes(), vec!["title", "authority"]);
        Ok(())
    }

    #[test]
    fn test_node_without_required_is_concrete_through_its_parent() -> Result<(), CoreError> {
        let legal = SchemaNode::new("LegalEntity").with_extends(["Thing"]);
        let model = model(legal, NodeSet::new([thing()])?);
        assert!(model.is_concrete());
        assert_eq!(model.own_attributes(), Vec::<String>::new());
        assert_eq!(model.parents_attributes(), vec!["name"]);
        Ok(())
    }

    #[test]
    fn test_linear_chain_parents_attributes() -> Result<(), CoreError> {
        let a = SchemaNode::new("A").with_required(["a1", "a2"]);
        let b = SchemaNode::new("B")
            .with_extends(["A"])
            .with_required(["a2", "b1"]);
        let c = SchemaNode::new("C").with_extends(["B"]).with_required(["c1"]);

        let model = model(c, NodeSet::new([a, b])?);
        assert_eq!(model.ancestors(), vec!["A", "B"]);
        assert_eq!(model.parents_attributes(), vec!["a1", "a2", "b1"]);
        assert_eq!(model.own_attributes(), vec!["c1"]);
        Ok(())
    }

    #[test]
    fn test_diamond_collapses_on_common_ancestor() -> Result<(), CoreError> {
        let a = SchemaNode::new("A").with_required(["id"]);
        let b = SchemaNode::new("B").with_extends(["A"]);
        let c = SchemaNode::new("C").with_extends(["A"]);
        let d = SchemaNode::new("D").with_extends(["B", "C"]);

        let set = NodeSet::with_mixins([a, b, c], ["B", "C"])?;
        let model = model(d, set);
        assert_eq!(model.concrete_parent(), Some("A"));
        assert!(model.is_concrete());
        assert_eq!(model.implements_list(), vec!["B", "C"]);
        assert_eq!(model.parents_attributes(), vec!["id"]);
        Ok(())
    }

    #[test]
    fn test_several_concrete_supertypes_first_wins() -> Result<(), CoreError> {
        let a = SchemaNode::new("A").with_required(["id"]);
        let b = SchemaNode::new("B").with_required(["code"]);
        let d = SchemaNode::new("D").with_extends(["B", "A"]);

        let model = model(d, NodeSet::new([a, b])?);
        assert_eq!(model.concrete_parent(), Some("B"));
        Ok(())
    }

    #[test]
    fn test_several_grandparents_first_in_declaration_order() -> Result<(), CoreError> {
        let a = SchemaNode::new("A").with_required(["id"]);
        let z = SchemaNode::new("Z").with_required(["code"]);
        let b = SchemaNode::new("B").with_extends(["Z"]);
        let c = SchemaNode::new("C").with_extends(["A"]);
        let d = SchemaNode::new("D").with_extends(["B", "C"]);

        let set = NodeSet::with_mixins([a, z, b, c], ["B", "C"])?;
        assert_eq!(model(d, set).concrete_parent(), Some("Z"));
        Ok(())
    }

    #[test]
    fn test_resolved_property_walks_concrete_chain() -> Result<(), CoreError> {
        let model = model(call_for_tenders(), NodeSet::new([thing(), interval()])?);

        assert_eq!(
            model.resolved_property("authority"),
            Some(&PropertyDescriptor::entity("LegalEntity"))
        );
        assert_eq!(
            model.resolved_property("name"),
            Some(&PropertyDescriptor::scalar("name"))
        );
        // declared on Interval, which is not on the concrete chain
        assert_eq!(model.resolved_property("startDate"), None);
        assert_eq!(model.resolved_property("nowhere"), None);
        Ok(())
    }

    #[test]
    fn test_featured_mode_orders_required_first() {
        let node = SchemaNode::new("Folder")
            .with_required(["name"])
            .with_featured(["title", "parent", "name"]);
        let model = SchemaModel::standalone(node, AttributeMode::Featured);
        assert_eq!(model.attributes(), vec!["name", "title", "parent"]);
    }

    #[test]
    fn test_missing_mixin_supertype_is_an_interface() {
        let payment = SchemaNode::new("Payment")
            .with_required(["amount"])
            .with_extends(["Asset"]);
        let model = SchemaModel::standalone(payment, AttributeMode::Required);

        assert!(model.is_concrete());
        assert_eq!(model.concrete_parent(), None);
        assert_eq!(model.implements_list(), vec!["Asset"]);
    }

    #[test]
    fn test_member_reuses_frozen_resolution() -> Result<(), CoreError> {
        let legal = SchemaNode::new("LegalEntity").with_extends(["Thing"]);
        let set = Arc::new(NodeSet::new([thing(), legal.clone()])?);

        let member = SchemaModel::new(legal, set.clone(), AttributeMode::Required);
        assert_eq!(
            set.resolution("LegalEntity"),
            Some(&Resolution {
                concrete: true,
                concrete_parent: Some("Thing".into())
            })
        );
        assert_eq!(member.concrete_parent(), Some("Thing"));

        // Same name but a different definition is resolved on its own
        let redefined = SchemaNode::new("LegalEntity").with_extends(["Asset"]);
        let model = SchemaModel::new(redefined, set, AttributeMode::Required);
        assert_eq!(model.concrete_parent(), None);
        assert!(!model.is_concrete());
        Ok(())
    }

    #[test]
    fn test_registered_parent() -> Result<(), CoreError> {
        let set = Arc::new(NodeSet::new([thing()])?);
        let registered = SchemaModel::new(thing(), set.clone(), AttributeMode::Required);
        let leaf = SchemaModel::new(call_for_tenders(), set, AttributeMode::Required);
        assert!(registered.is_registered_parent());
        assert!(!leaf.is_registered_parent());
        Ok(())
    }
}
