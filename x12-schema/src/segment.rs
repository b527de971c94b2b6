use std::collections::HashMap;
use std::sync::Arc;

use crate::element::{CompositeDef, ElementDef};
use crate::error::SchemaError;
use crate::usage::{RepeatCount, Usage};

/// What an [`ElementUse`] position binds to: a simple element or a composite.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementUseDef {
    Element(Arc<ElementDef>),
    Composite(Arc<CompositeDef>),
}

/// A simple or composite element bound at a 1-indexed, dense position
/// within a segment, with its usage and repetition (X12 allows a repeated
/// simple element at one position via the repetition separator).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUse {
    pub position: u16,
    pub definition: ElementUseDef,
    pub usage: Usage,
    pub repeat_count: RepeatCount,
}

/// A segment definition: its identifying tag and an ordered, dense list
/// of element positions.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDef {
    /// Identifying tag, e.g. `"ISA"`, `"NM1"`.
    pub id: String,
    pub name: String,
    pub purpose: String,
    pub elements: Vec<ElementUse>,
}

impl SegmentDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        purpose: impl Into<String>,
        elements: Vec<ElementUse>,
    ) -> Result<Arc<Self>, SchemaError> {
        let id = id.into();
        crate::dense::assert_dense(&id, elements.iter().map(|e| e.position))?;
        Ok(Arc::new(Self {
            id,
            name: name.into(),
            purpose: purpose.into(),
            elements,
        }))
    }

    pub fn element_at(&self, position: u16) -> Result<&ElementUse, SchemaError> {
        position
            .checked_sub(1)
            .and_then(|i| self.elements.get(i as usize))
            .ok_or(SchemaError::OutOfRange {
                position,
                len: self.elements.len(),
            })
    }
}

/// Any nestable schema node that can occupy a [`ChildUse`] position: a leaf
/// segment, or one of the three container levels above it.
///
/// Unifying all nesting levels behind one enum lets the parser's zipper
/// (`x12-parser`) walk loop/transaction-set/functional-group/interchange
/// frames with the same placement logic instead of one per level.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildDef {
    Segment(Arc<SegmentDef>),
    Loop(Arc<crate::container::LoopDef>),
    TransactionSet(Arc<crate::container::TransactionSetDef>),
    FunctionalGroup(Arc<crate::container::FunctionalGroupDef>),
}

impl ChildDef {
    /// The segment id that, when encountered, could start this child:
    /// the segment's own id, or (recursively) the id of the first segment
    /// reachable through a loop's leading children.
    pub fn trigger_id(&self) -> Option<&str> {
        match self {
            ChildDef::Segment(s) => Some(&s.id),
            ChildDef::Loop(l) => l.trigger_id(),
            ChildDef::TransactionSet(t) => Some(&t.header.id),
            ChildDef::FunctionalGroup(g) => Some(&g.header.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ChildDef::Segment(s) => &s.name,
            ChildDef::Loop(l) => &l.name,
            ChildDef::TransactionSet(t) => &t.name,
            ChildDef::FunctionalGroup(g) => &g.name,
        }
    }
}

/// A child definition bound at a 1-indexed, dense position within its
/// parent container, with its usage and repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildUse {
    pub position: u16,
    pub child: ChildDef,
    pub usage: Usage,
    pub repeat_count: RepeatCount,
}

/// A version-scoped dictionary of segment definitions, keyed by tag.
///
/// Separate from the per-transaction-set schema tree because the same
/// segment (e.g. `N1`, `REF`) recurs across many transaction sets and loops;
/// definitions are shared by `Arc` rather than duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDict {
    pub version: String,
    segments: HashMap<String, Arc<SegmentDef>>,
}

impl SegmentDict {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            segments: HashMap::new(),
        }
    }

    pub fn insert(&mut self, def: Arc<SegmentDef>) -> Result<(), SchemaError> {
        if self.segments.contains_key(&def.id) {
            return Err(SchemaError::DuplicateDefinition {
                parent: self.version.clone(),
                id: def.id.clone(),
            });
        }
        self.segments.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&Arc<SegmentDef>> {
        self.segments.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn plain_element(id: &str) -> ElementUseDef {
        ElementUseDef::Element(ElementDef::new(id, id, 1, 10, ElementKind::AlphaNumeric).unwrap())
    }

    #[test]
    fn segment_rejects_non_dense_elements() {
        let elements = vec![
            ElementUse {
                position: 1,
                definition: plain_element("E1"),
                usage: Usage::Mandatory,
                repeat_count: RepeatCount::Bounded(1),
            },
            ElementUse {
                position: 3,
                definition: plain_element("E2"),
                usage: Usage::Optional,
                repeat_count: RepeatCount::Bounded(1),
            },
        ];
        let err = SegmentDef::new("XX", "Test Segment", "test", elements).unwrap_err();
        assert!(matches!(err, SchemaError::NonDensePositions { .. }));
    }

    #[test]
    fn dict_rejects_duplicate_insert() {
        let def = SegmentDef::new("NM1", "Individual or Organizational Name", "name", vec![])
            .unwrap();
        let mut dict = SegmentDict::new("005010");
        dict.insert(def.clone()).unwrap();
        let err = dict.insert(def).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDefinition { .. }));
    }

    #[test]
    fn dict_lookup_finds_inserted() {
        let def = SegmentDef::new("BHT", "Beginning of Hierarchical Transaction", "bht", vec![])
            .unwrap();
        let mut dict = SegmentDict::new("005010");
        dict.insert(def).unwrap();
        assert!(dict.lookup("BHT").is_some());
        assert!(dict.lookup("ZZZ").is_none());
    }
}
