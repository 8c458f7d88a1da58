//! The closed, frozen set of schema nodes that act as supertypes
//!
//! A `NodeSet` is built once per generation run and shared read-only by every
//! [`SchemaModel`](crate::SchemaModel). Building it checks the inheritance
//! graph for cycles and resolves the concrete parent of every member, so that
//! later queries are plain lookups.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::{CoreError, SchemaNode};

/// Schema types that are never materialized as stateful classes
pub const DEFAULT_MIXINS: &[&str] = &["Asset"];

/// Derived inheritance facts about one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub concrete: bool,
    pub concrete_parent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Read-only mapping from type name to the nodes referenced as supertypes
#[derive(Debug, Clone)]
pub struct NodeSet {
    nodes: BTreeMap<String, SchemaNode>,
    mixins: BTreeSet<String>,
    resolutions: BTreeMap<String, Resolution>,
}

impl Default for NodeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl NodeSet {
    /// An empty set using the default mixins
    pub fn empty() -> Self {
        Self {
            nodes: BTreeMap::new(),
            mixins: default_mixins(),
            resolutions: BTreeMap::new(),
        }
    }

    /// Freeze `nodes` using the default mixin names
    pub fn new<I>(nodes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        Self::with_mixins(nodes, default_mixins())
    }

    /// Freeze `nodes`, treating every name in `mixins` as never concrete.
    ///
    /// Fails with [`CoreError::InheritanceCycle`] when some supertype chain
    /// inside the set loops.
    pub fn with_mixins<I, M, S>(nodes: I, mixins: M) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = SchemaNode>,
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.name.clone(), node))
                .collect(),
            mixins: mixins.into_iter().map(Into::into).collect(),
            resolutions: BTreeMap::new(),
        };
        set.resolve_all()?;
        debug!(
            "Froze node set with {} types ({} mixins)",
            set.nodes.len(),
            set.mixins.len()
        );
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn is_mixin(&self, name: &str) -> bool {
        self.mixins.contains(name)
    }

    pub fn mixins(&self) -> impl Iterator<Item = &str> {
        self.mixins.iter().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inheritance facts of a member. `None` for names outside the set.
    pub fn resolution(&self, name: &str) -> Option<&Resolution> {
        self.resolutions.get(name)
    }

    /// Whether a declared supertype counts as concrete. Names outside the set
    /// default to concrete, unless they are mixins.
    pub fn is_concrete_supertype(&self, name: &str) -> bool {
        self.resolutions
            .get(name)
            .map_or(!self.is_mixin(name), |r| r.concrete)
    }

    /// Resolve one node against the already-resolved members of this set.
    ///
    /// Every supertype of `node` that is a member must already have its
    /// resolution recorded.
    pub fn resolve(&self, node: &SchemaNode) -> Resolution {
        let concrete_parent = self.pick_concrete_parent(node);
        let concrete = !self.is_mixin(&node.name)
            && (!node.required.is_empty() || concrete_parent.is_some());
        Resolution {
            concrete,
            concrete_parent,
        }
    }

    fn pick_concrete_parent(&self, node: &SchemaNode) -> Option<String> {
        let concrete: Vec<&String> = node
            .extends
            .iter()
            .filter(|name| self.is_concrete_supertype(name))
            .collect();

        match concrete.as_slice() {
            [only] => return Some((*only).clone()),
            [first, ..] => {
                warn!(
                    "{} has several concrete supertypes {:?}, extending {}",
                    node.name, concrete, first
                );
                return Some((*first).clone());
            }
            [] => {}
        }

        // No direct candidate: collapse the diamond onto the supertypes' own
        // concrete parents, first seen in declaration order.
        let mut grandparents: Vec<&str> = Vec::new();
        for name in &node.extends {
            let parent = self
                .resolutions
                .get(name)
                .and_then(|r| r.concrete_parent.as_deref());
            if let Some(parent) = parent {
                if !grandparents.contains(&parent) {
                    grandparents.push(parent);
                }
            }
        }
        if grandparents.len() > 1 {
            warn!(
                "{} inherits several concrete ancestors {:?}, extending {}",
                node.name, grandparents, grandparents[0]
            );
        }
        grandparents.first().map(|name| name.to_string())
    }

    /// Depth-first walk that rejects cycles and records resolutions in
    /// post-order, so supertypes are always resolved before their subtypes.
    fn resolve_all(&mut self) -> Result<(), CoreError> {
        let mut state: BTreeMap<String, Visit> = BTreeMap::new();
        let mut path: Vec<String> = Vec::new();
        let names: Vec<String> = self.nodes.keys().cloned().collect();
        for name in names {
            self.visit(&name, &mut state, &mut path)?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        name: &str,
        state: &mut BTreeMap<String, Visit>,
        path: &mut Vec<String>,
    ) -> Result<(), CoreError> {
        match state.get(name) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = path.iter().position(|n| n == name).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(name.to_string());
                return Err(CoreError::InheritanceCycle { path: cycle });
            }
            None => {}
        }

        let Some(node) = self.nodes.get(name) else {
            return Ok(());
        };
        let supertypes = node.extends.clone();

        state.insert(name.to_string(), Visit::InProgress);
        path.push(name.to_string());
        for supertype in &supertypes {
            self.visit(supertype, state, path)?;
        }
        path.pop();
        state.insert(name.to_string(), Visit::Done);

        if let Some(node) = self.nodes.get(name) {
            let resolution = self.resolve(node);
            self.resolutions.insert(name.to_string(), resolution);
        }
        Ok(())
    }
}

fn default_mixins() -> BTreeSet<String> {
    DEFAULT_MIXINS.iter().map(|s| s.to_string()).collect()
}
