//! # Rule Trees
//!
//! A rule tree mirrors the operation types of an API:
//!
//! ```text
//! RuleTree
//!   ├─ "Query"    ─→ RuleNode::Type(rule)            (every field)
//!   └─ "Mutation" ─→ RuleNode::Fields
//!                      ├─ "createPost" ─→ rule
//!                      └─ "deletePost" ─→ rule
//! ```
//!
//! Trees are assembled once and only read afterwards.

use crate::rule::SharedRule;
use std::collections::BTreeMap;
use std::fmt;

/// Rules attached to one operation type.
pub enum RuleNode<C> {
    /// One rule guarding every field of the type.
    Type(SharedRule<C>),
    /// One rule per listed field.
    Fields(BTreeMap<String, SharedRule<C>>),
}

impl<C> Clone for RuleNode<C> {
    fn clone(&self) -> Self {
        match self {
            RuleNode::Type(rule) => RuleNode::Type(rule.clone()),
            RuleNode::Fields(fields) => RuleNode::Fields(fields.clone()),
        }
    }
}

impl<C> RuleNode<C> {
    /// Get the rule covering `field_name`, if any.
    pub fn rule_for(&self, field_name: &str) -> Option<&SharedRule<C>> {
        match self {
            RuleNode::Type(rule) => Some(rule),
            RuleNode::Fields(fields) => fields.get(field_name),
        }
    }

    /// Key structure of this node.
    pub fn shape(&self) -> NodeShape {
        match self {
            RuleNode::Type(_) => NodeShape::Type,
            RuleNode::Fields(fields) => NodeShape::Fields(fields.keys().cloned().collect()),
        }
    }
}

impl<C> fmt::Debug for RuleNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleNode::Type(rule) => f.debug_tuple("Type").field(&rule.name()).finish(),
            RuleNode::Fields(fields) => f
                .debug_map()
                .entries(fields.iter().map(|(k, r)| (k, r.name())))
                .finish(),
        }
    }
}

/// Key structure of a node, without the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeShape {
    /// Type-level rule.
    Type,
    /// Field-level rules for the listed fields (sorted).
    Fields(Vec<String>),
}

/// Operation type name to rule node.
pub struct RuleTree<C> {
    nodes: BTreeMap<String, RuleNode<C>>,
}

impl<C> RuleTree<C> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }

    /// Guard every field of `type_name` with one rule.
    ///
    /// Replaces any node previously attached to the type.
    pub fn insert_type(&mut self, type_name: impl Into<String>, rule: SharedRule<C>) {
        self.nodes.insert(type_name.into(), RuleNode::Type(rule));
    }

    /// Guard a single field.
    ///
    /// A type-level node already attached to `type_name` is replaced by a
    /// field map.
    pub fn insert_field(
        &mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        rule: SharedRule<C>,
    ) {
        let node = self
            .nodes
            .entry(type_name.into())
            .or_insert_with(|| RuleNode::Fields(BTreeMap::new()));

        if let RuleNode::Type(_) = node {
            *node = RuleNode::Fields(BTreeMap::new());
        }
        if let RuleNode::Fields(fields) = node {
            fields.insert(field_name.into(), rule);
        }
    }

    /// Attach a prepared node to `type_name`.
    pub fn insert_node(&mut self, type_name: impl Into<String>, node: RuleNode<C>) {
        self.nodes.insert(type_name.into(), node);
    }

    /// Get the node for an operation type.
    pub fn get(&self, type_name: &str) -> Option<&RuleNode<C>> {
        self.nodes.get(type_name)
    }

    /// Get the rule covering `type_name.field_name`, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use shield_rules::{allow, RuleTree};
    ///
    /// let mut tree = RuleTree::<()>::new();
    /// tree.insert_type("Query", allow());
    /// tree.insert_field("Mutation", "createPost", allow());
    ///
    /// assert!(tree.rule_for("Query", "anything").is_some());
    /// assert!(tree.rule_for("Mutation", "createPost").is_some());
    /// assert!(tree.rule_for("Mutation", "deletePost").is_none());
    /// ```
    pub fn rule_for(&self, type_name: &str, field_name: &str) -> Option<&SharedRule<C>> {
        self.nodes.get(type_name)?.rule_for(field_name)
    }

    /// Iterate over operation types and their nodes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleNode<C>)> {
        self.nodes.iter()
    }

    /// Operation type names in sorted order.
    pub fn type_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Key structure of the whole tree.
    pub fn shape(&self) -> BTreeMap<String, NodeShape> {
        self.nodes
            .iter()
            .map(|(name, node)| (name.clone(), node.shape()))
            .collect()
    }

    /// Total number of rules attached to the tree.
    pub fn rule_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| match node {
                RuleNode::Type(_) => 1,
                RuleNode::Fields(fields) => fields.len(),
            })
            .sum()
    }

    /// Number of operation types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<C> Default for RuleTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for RuleTree<C> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<C> fmt::Debug for RuleTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.nodes.iter()).finish()
    }
}
