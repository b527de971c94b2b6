use std::sync::Arc;

use x12_schema::Usage;
use x12_tokenizer::{Position, Separators};
use x12_value::AnyValue;

use crate::change::FieldChange;

/// Which schema nesting level a [`Node`] represents. `Composite` and
/// `Element` are leaves relative to the envelope hierarchy but still
/// participate in the same uniform shape, per `spec.md`'s "Constructed
/// Node" data model entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Interchange,
    FunctionalGroup,
    TransactionSet,
    Loop,
    Segment,
    Composite,
    Element,
}

/// The leaf payload of an `Element` node: a single value, or (when the
/// element's use allows more than one occurrence via the repetition
/// separator) an ordered list of values under one child slot.
#[derive(Debug, Clone)]
pub enum Leaf {
    Single(AnyValue),
    Repeated(Vec<AnyValue>),
}

/// A node in the constructed value tree (component C5).
///
/// Every node carries its schema identity (`name`, matching the
/// definition id it was built from), usage, position, and the
/// interchange's separators, plus either nested children (container,
/// segment, and composite nodes) or a leaf value (element nodes).
/// Immutable once built; [`Node::copy`] returns an updated clone rather
/// than mutating in place.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub usage: Usage,
    pub position: Position,
    pub separators: Arc<Separators>,
    children: Vec<Node>,
    leaf: Option<Leaf>,
}

impl Node {
    /// Builds a container, segment, or composite node from an ordered,
    /// 1-indexed-dense list of children.
    pub fn branch(
        kind: NodeKind,
        name: impl Into<String>,
        usage: Usage,
        position: Position,
        separators: Arc<Separators>,
        children: Vec<Node>,
    ) -> Self {
        debug_assert!(!matches!(kind, NodeKind::Element), "element nodes are leaves, built via Node::leaf");
        Self {
            kind,
            name: name.into(),
            usage,
            position,
            separators,
            children,
            leaf: None,
        }
    }

    /// Builds an `Element` leaf node carrying a single value.
    pub fn leaf(
        name: impl Into<String>,
        usage: Usage,
        position: Position,
        separators: Arc<Separators>,
        value: AnyValue,
    ) -> Self {
        Self {
            kind: NodeKind::Element,
            name: name.into(),
            usage,
            position,
            separators,
            children: Vec::new(),
            leaf: Some(Leaf::Single(value)),
        }
    }

    /// Builds an `Element` leaf node carrying a repeated occurrence list.
    pub fn repeated_leaf(
        name: impl Into<String>,
        usage: Usage,
        position: Position,
        separators: Arc<Separators>,
        values: Vec<AnyValue>,
    ) -> Self {
        Self {
            kind: NodeKind::Element,
            name: name.into(),
            usage,
            position,
            separators,
            children: Vec::new(),
            leaf: Some(Leaf::Repeated(values)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// 1-indexed child lookup, matching the schema's position numbering.
    pub fn element(&self, position: usize) -> Option<&Node> {
        position.checked_sub(1).and_then(|i| self.children.get(i))
    }

    pub fn leaf_value(&self) -> Option<&Leaf> {
        self.leaf.as_ref()
    }

    pub fn value(&self) -> Option<&AnyValue> {
        match &self.leaf {
            Some(Leaf::Single(v)) => Some(v),
            _ => None,
        }
    }

    pub fn repetitions(&self) -> Option<&[AnyValue]> {
        match &self.leaf {
            Some(Leaf::Repeated(vs)) => Some(vs),
            _ => None,
        }
    }

    /// Finds the first direct child segment/loop/etc. named `id`, honoring
    /// `occurrence` (0-indexed among same-named siblings) for repeated
    /// children.
    pub fn segment(&self, id: &str, occurrence: usize) -> Option<&Node> {
        self.children
            .iter()
            .filter(|c| c.name == id)
            .nth(occurrence)
    }

    /// Walks a dot-free path of 1-indexed positions from this node down
    /// through descendants.
    pub fn at(&self, path: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &position in path {
            current = current.element(position)?;
        }
        Some(current)
    }

    /// Pure-functional update: returns a new node with `changes` applied,
    /// in order, on top of a clone of `self`.
    pub fn copy(&self, changes: &[FieldChange]) -> Node {
        let mut updated = self.clone();
        for change in changes {
            change.apply(&mut updated);
        }
        updated
    }

    pub(crate) fn set_child(&mut self, position: usize, node: Node) {
        if let Some(slot) = position.checked_sub(1).and_then(|i| self.children.get_mut(i)) {
            *slot = node;
        }
    }

    pub(crate) fn set_leaf(&mut self, leaf: Leaf) {
        self.leaf = Some(leaf);
    }

    pub(crate) fn set_separators(&mut self, separators: Arc<Separators>) {
        self.separators = separators.clone();
        for child in &mut self.children {
            child.set_separators(separators.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_schema::{ElementDef, ElementKind as SchemaKind};
    use x12_value::read_value;

    fn separators() -> Arc<Separators> {
        Arc::new(Separators::default())
    }

    fn leaf_node(name: &str, raw: &str) -> Node {
        let def = ElementDef::new(name, name, 1, 5, SchemaKind::AlphaNumeric).unwrap();
        let value = read_value(raw, def, Usage::Mandatory, Position::default());
        Node::leaf(name, Usage::Mandatory, Position::default(), separators(), value)
    }

    #[test]
    fn element_lookup_is_one_indexed() {
        let seg = Node::branch(
            NodeKind::Segment,
            "NM1",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![leaf_node("E1", "A"), leaf_node("E2", "B")],
        );
        assert_eq!(seg.element(1).unwrap().value().unwrap().to_wire(true), "A");
        assert_eq!(seg.element(2).unwrap().value().unwrap().to_wire(true), "B");
        assert!(seg.element(3).is_none());
    }

    #[test]
    fn copy_replaces_a_child_without_mutating_original() {
        let original = Node::branch(
            NodeKind::Segment,
            "NM1",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![leaf_node("E1", "A")],
        );
        let replacement = leaf_node("E1", "Z");
        let updated = original.copy(&[FieldChange::Element { position: 1, node: replacement }]);
        assert_eq!(original.element(1).unwrap().value().unwrap().to_wire(true), "A");
        assert_eq!(updated.element(1).unwrap().value().unwrap().to_wire(true), "Z");
    }

    #[test]
    fn at_walks_nested_positions() {
        let inner = Node::branch(
            NodeKind::Composite,
            "C1",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![leaf_node("E1", "A")],
        );
        let outer = Node::branch(
            NodeKind::Segment,
            "NM1",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![inner],
        );
        assert_eq!(outer.at(&[1, 1]).unwrap().value().unwrap().to_wire(true), "A");
        assert!(outer.at(&[1, 2]).is_none());
    }
}
