use std::sync::Arc;

use x12_schema::{
    ChildContainer, ChildUse, FunctionalGroupDef, InterchangeDef, LoopDef, SegmentDef, TransactionSetDef, Usage,
};
use x12_tokenizer::Position;
use x12_tree::NodeKind;

/// Which concrete schema container a [`Frame`] is currently tracking.
///
/// Unifying all four nesting levels behind one enum lets the driver treat
/// "open a child, match against its declared children, close against a
/// trailer" uniformly; only `Loop` has no header/trailer pair.
#[derive(Clone)]
pub(crate) enum ContainerDef {
    Interchange(Arc<InterchangeDef>),
    FunctionalGroup(Arc<FunctionalGroupDef>),
    TransactionSet(Arc<TransactionSetDef>),
    Loop(Arc<LoopDef>),
}

impl ContainerDef {
    pub(crate) fn children(&self) -> &[ChildUse] {
        match self {
            ContainerDef::Interchange(d) => d.children(),
            ContainerDef::FunctionalGroup(d) => d.children(),
            ContainerDef::TransactionSet(d) => d.children(),
            ContainerDef::Loop(d) => d.children(),
        }
    }

    pub(crate) fn trailer(&self) -> Option<&Arc<SegmentDef>> {
        match self {
            ContainerDef::Interchange(d) => Some(&d.trailer),
            ContainerDef::FunctionalGroup(d) => Some(&d.trailer),
            ContainerDef::TransactionSet(d) => Some(&d.trailer),
            ContainerDef::Loop(_) => None,
        }
    }

    pub(crate) fn node_kind(&self) -> NodeKind {
        match self {
            ContainerDef::Interchange(_) => NodeKind::Interchange,
            ContainerDef::FunctionalGroup(_) => NodeKind::FunctionalGroup,
            ContainerDef::TransactionSet(_) => NodeKind::TransactionSet,
            ContainerDef::Loop(_) => NodeKind::Loop,
        }
    }

    /// The identity this container's constructed node is named after:
    /// the interchange version, the functional identifier code, the
    /// transaction set code, or the loop id: whichever the schema uses to
    /// name this container, not its free-text `name` field.
    pub(crate) fn identity(&self) -> &str {
        match self {
            ContainerDef::Interchange(d) => &d.version,
            ContainerDef::FunctionalGroup(d) => &d.functional_id_code,
            ContainerDef::TransactionSet(d) => &d.id,
            ContainerDef::Loop(d) => &d.id,
        }
    }
}

/// One open level of the parser's zipper: the schema container being
/// matched against, a cursor into its declared children, and the
/// per-child occurrence counts seen so far (`spec.md` §4.6 "State").
pub(crate) struct Frame {
    pub(crate) container: ContainerDef,
    pub(crate) usage: Usage,
    pub(crate) position: Position,
    pub(crate) children_defs: Vec<ChildUse>,
    pub(crate) cursor: usize,
    pub(crate) counts: Vec<u32>,
    pub(crate) matched: Vec<x12_tree::Node>,
}

impl Frame {
    pub(crate) fn new(container: ContainerDef, usage: Usage, position: Position) -> Self {
        let children_defs = container.children().to_vec();
        let len = children_defs.len();
        Self {
            container,
            usage,
            position,
            children_defs,
            cursor: 0,
            counts: vec![0; len],
            matched: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> String {
        self.container.identity().to_string()
    }
}
