use std::sync::Arc;

use x12_tokenizer::Separators;

use crate::node::{Leaf, Node};

/// One field replacement applied by [`Node::copy`](crate::Node::copy).
///
/// Modeled as a small closed set rather than a generic field-path/value
/// pair, since a constructed node's only mutable-in-spirit fields are its
/// children, its leaf payload, and (recursively) its separators handle.
#[derive(Debug, Clone)]
pub enum FieldChange {
    /// Replaces the child at a 1-indexed position with a whole new node.
    Element { position: usize, node: Node },
    /// Replaces this node's own leaf payload (only meaningful on an
    /// `Element` node).
    Leaf(Leaf),
    /// Swaps the separators handle on this node and every descendant.
    Separators(Arc<Separators>),
}

impl FieldChange {
    pub(crate) fn apply(&self, target: &mut Node) {
        match self {
            FieldChange::Element { position, node } => target.set_child(*position, node.clone()),
            FieldChange::Leaf(leaf) => target.set_leaf(leaf.clone()),
            FieldChange::Separators(separators) => target.set_separators(separators.clone()),
        }
    }
}
