use alloc::vec::Vec;

use crate::position::Position;

/// The shape of one occurrence of an element: either a single raw slice, or
/// (when the component separator appears inside it) an ordered list of
/// component slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementShape<'a> {
    Simple(&'a [u8]),
    Composite(Vec<&'a [u8]>),
}

impl<'a> ElementShape<'a> {
    pub fn is_empty(&self) -> bool {
        match self {
            ElementShape::Simple(s) => s.is_empty(),
            ElementShape::Composite(cs) => cs.iter().all(|c| c.is_empty()),
        }
    }

    pub fn as_simple(&self) -> Option<&'a [u8]> {
        match self {
            ElementShape::Simple(s) => Some(s),
            ElementShape::Composite(_) => None,
        }
    }

    pub fn as_components(&self) -> Option<&[&'a [u8]]> {
        match self {
            ElementShape::Composite(cs) => Some(cs),
            ElementShape::Simple(_) => None,
        }
    }
}

/// One element slot within a segment. Most elements occur exactly once;
/// `repetitions` holds more than one entry only when the repetition
/// separator split the raw field into several occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTok<'a> {
    pub repetitions: Vec<ElementShape<'a>>,
    pub position: Position,
}

impl<'a> ElementTok<'a> {
    pub fn is_repeated(&self) -> bool {
        self.repetitions.len() > 1
    }

    /// The first (and, absent repetition, only) occurrence's shape.
    pub fn shape(&self) -> Option<&ElementShape<'a>> {
        self.repetitions.first()
    }

    pub fn is_empty(&self) -> bool {
        self.repetitions.iter().all(ElementShape::is_empty)
    }
}

/// A tokenized segment: its identifier, its element slots, and its position
/// in the stream. Carries zero-copy references into the original buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTok<'a> {
    /// Segment identifier (e.g. `ISA`, `GS`, `ST`, `NM1`), 2-3 bytes.
    pub id: &'a [u8],
    /// False when `id` is not uppercase alphanumeric; the tokenizer still
    /// emits the token rather than aborting (see module docs).
    pub id_well_formed: bool,
    pub elements: Vec<ElementTok<'a>>,
    pub position: Position,
}

impl<'a> SegmentTok<'a> {
    pub fn id_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.id).ok()
    }

    pub fn element(&self, index_one_based: usize) -> Option<&ElementTok<'a>> {
        index_one_based
            .checked_sub(1)
            .and_then(|i| self.elements.get(i))
    }
}
