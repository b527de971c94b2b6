//! Schema-directed parser state machine (component C6): reduces an
//! `x12-tokenizer` token stream, consulting an `x12-schema` schema tree,
//! into a constructed `x12-tree` node plus the structural errors found
//! along the way.
//!
//! The zipper is a `Vec<Frame>` stack mirroring the open
//! Interchange/FunctionalGroup/TransactionSet/Loop nesting. Each token is
//! matched against the innermost open frame's declared children following
//! the placement rules in `spec.md` §4.6: continue the current child,
//! advance past satisfied ones, open a new child (segment, loop, or
//! nested transaction set/functional group) whose trigger id matches, or
//! close the frame and retry against its parent. A token matching nothing
//! anywhere up the stack is reported and dropped rather than aborting the
//! parse.

mod driver;
mod element;
mod error;
mod frame;

use std::sync::Arc;

use x12_schema::{InterchangeDef, SchemaCatalog, Usage};
use x12_tokenizer::Tokenizer;
use x12_tree::Node;

pub use error::StructuralError;

use crate::driver::{close_frame, place_token};
use crate::element::build_segment_node;
use crate::frame::{ContainerDef, Frame};

/// The result of a parse: the constructed tree (absent only when a fatal
/// error prevented building one at all) plus every structural error
/// encountered, in stream order.
#[derive(Debug)]
pub struct ParseOutcome {
    pub tree: Option<Node>,
    pub errors: Vec<StructuralError>,
}

impl ParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.tree.is_some() && self.errors.is_empty()
    }
}

/// Parses `bytes` under `root`, consulting `catalog` for the segment
/// dictionary used to tell [`StructuralError::UnknownSegment`] (a tag the
/// dictionary has never heard of) apart from [`StructuralError::UnexpectedSegment`]
/// (a known tag, just not valid here).
pub fn parse(bytes: &[u8], root: &Arc<InterchangeDef>, catalog: &dyn SchemaCatalog) -> ParseOutcome {
    let mut errors = Vec::new();
    let mut tokenizer = Tokenizer::new(bytes);

    let first = match tokenizer.next() {
        None => {
            errors.push(StructuralError::MalformedHeader { reason: "empty input" });
            return ParseOutcome { tree: None, errors };
        }
        Some(Err(e)) => {
            errors.push(e.into());
            return ParseOutcome { tree: None, errors };
        }
        Some(Ok(tok)) => tok,
    };

    let separators = Arc::new(
        tokenizer
            .separators()
            .expect("the tokenizer recovers separators before yielding its first token"),
    );
    let dict = catalog.segment_dict(&root.version);

    let isa_node = build_segment_node(&first, &root.header, Usage::Mandatory, separators.clone(), &mut errors);
    let mut root_frame = Frame::new(ContainerDef::Interchange(root.clone()), Usage::Mandatory, first.position);
    root_frame.matched.push(isa_node);
    let mut stack = vec![root_frame];
    let mut tree = None;

    for item in tokenizer {
        if stack.is_empty() {
            break;
        }
        match item {
            Ok(tok) => {
                if let Some(closed) = place_token(&mut stack, &tok, dict.as_deref(), &separators, &mut errors) {
                    tree = Some(closed);
                }
            }
            Err(e) => {
                errors.push(e.into());
                break;
            }
        }
    }

    while stack.len() > 1 {
        close_frame(&mut stack, None, &separators, &mut errors);
    }
    if !stack.is_empty() {
        if let Some(closed) = close_frame(&mut stack, None, &separators, &mut errors) {
            tree = Some(closed);
        }
    }

    ParseOutcome { tree, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_schema::{
        ChildDef, ChildUse, ElementDef, ElementKind, ElementUse, ElementUseDef, LoopDef, RepeatCount, SegmentDef,
        SegmentDict,
    };

    fn isa_def() -> Arc<SegmentDef> {
        let kind = |id: &str| ElementDef::new(id, id, 1, 15, ElementKind::AlphaNumeric).unwrap();
        let elements = (1..=16)
            .map(|i| ElementUse {
                position: i,
                definition: ElementUseDef::Element(kind(&format!("ISA{i:02}"))),
                usage: Usage::Mandatory,
                repeat_count: RepeatCount::Bounded(1),
            })
            .collect();
        SegmentDef::new("ISA", "Interchange Control Header", "isa", elements).unwrap()
    }

    fn iea_def() -> Arc<SegmentDef> {
        let count = ElementDef::new("IEA01", "Number of Included Groups", 1, 5, ElementKind::Numeric { precision: 0 }).unwrap();
        let control = ElementDef::new("IEA02", "Interchange Control Number", 9, 9, ElementKind::Numeric { precision: 0 }).unwrap();
        SegmentDef::new(
            "IEA",
            "Interchange Control Trailer",
            "iea",
            vec![
                ElementUse { position: 1, definition: ElementUseDef::Element(count), usage: Usage::Mandatory, repeat_count: RepeatCount::Bounded(1) },
                ElementUse { position: 2, definition: ElementUseDef::Element(control), usage: Usage::Mandatory, repeat_count: RepeatCount::Bounded(1) },
            ],
        )
        .unwrap()
    }

    fn gs_def() -> Arc<SegmentDef> {
        let code = ElementDef::new("GS01", "Functional Identifier Code", 2, 2, ElementKind::Identifier).unwrap();
        SegmentDef::new(
            "GS",
            "Functional Group Header",
            "gs",
            vec![ElementUse { position: 1, definition: ElementUseDef::Element(code), usage: Usage::Mandatory, repeat_count: RepeatCount::Bounded(1) }],
        )
        .unwrap()
    }

    fn ge_def() -> Arc<SegmentDef> {
        let count = ElementDef::new("GE01", "Number of Transaction Sets Included", 1, 6, ElementKind::Numeric { precision: 0 }).unwrap();
        SegmentDef::new(
            "GE",
            "Functional Group Trailer",
            "ge",
            vec![ElementUse { position: 1, definition: ElementUseDef::Element(count), usage: Usage::Mandatory, repeat_count: RepeatCount::Bounded(1) }],
        )
        .unwrap()
    }

    fn nm1_def() -> Arc<SegmentDef> {
        let entity = ElementDef::new("NM101", "Entity Identifier Code", 2, 3, ElementKind::Identifier).unwrap();
        let name = ElementDef::new("NM103", "Name Last or Organization Name", 1, 60, ElementKind::AlphaNumeric).unwrap();
        SegmentDef::new(
            "NM1",
            "Individual or Organizational Name",
            "nm1",
            vec![
                ElementUse { position: 1, definition: ElementUseDef::Element(entity), usage: Usage::Mandatory, repeat_count: RepeatCount::Bounded(1) },
                ElementUse { position: 3, definition: ElementUseDef::Element(name), usage: Usage::Optional, repeat_count: RepeatCount::Bounded(1) },
            ],
        )
        .unwrap()
    }

    /// A bare interchange with zero mandatory body content: just ISA/IEA.
    fn bare_interchange() -> (Arc<InterchangeDef>, Arc<SegmentDict>) {
        let mut dict = SegmentDict::new("005010");
        dict.insert(isa_def()).unwrap();
        dict.insert(iea_def()).unwrap();
        let dict = Arc::new(dict);
        let root = InterchangeDef::new("005010", isa_def(), iea_def(), vec![], dict.clone()).unwrap();
        (root, dict)
    }

    /// An interchange with one optional, unbounded functional-group slot
    /// carrying a single NM1 loop child bounded at 2 repetitions.
    fn interchange_with_groups() -> (Arc<InterchangeDef>, Arc<SegmentDict>) {
        let nm1_loop = LoopDef::new(
            "NM1LOOP",
            "Name Loop",
            vec![ChildUse {
                position: 1,
                child: ChildDef::Segment(nm1_def()),
                usage: Usage::Mandatory,
                repeat_count: RepeatCount::Bounded(1),
            }],
        )
        .unwrap();

        let fg_children = vec![ChildUse {
            position: 1,
            child: ChildDef::Loop(nm1_loop),
            usage: Usage::Optional,
            repeat_count: RepeatCount::Bounded(2),
        }];
        let fg = x12_schema::FunctionalGroupDef::new("HC", "Health Care Claim", gs_def(), ge_def(), fg_children).unwrap();

        let mut dict = SegmentDict::new("005010");
        for def in [isa_def(), iea_def(), gs_def(), ge_def(), nm1_def()] {
            dict.insert(def).unwrap();
        }
        let dict = Arc::new(dict);

        let children = vec![ChildUse {
            position: 1,
            child: ChildDef::FunctionalGroup(fg),
            usage: Usage::Optional,
            repeat_count: RepeatCount::Unbounded,
        }];
        let root = InterchangeDef::new("005010", isa_def(), iea_def(), children, dict.clone()).unwrap();
        (root, dict)
    }

    struct FixtureCatalog {
        root: Arc<InterchangeDef>,
        dict: Arc<SegmentDict>,
    }

    impl SchemaCatalog for FixtureCatalog {
        fn interchange_def(&self, version: &str) -> Option<Arc<InterchangeDef>> {
            (version == self.root.version).then(|| self.root.clone())
        }
        fn functional_group_def(&self, _version: &str, _code: &str) -> Option<Arc<x12_schema::FunctionalGroupDef>> {
            None
        }
        fn transaction_set_def(&self, _version: &str, _id: &str) -> Option<Arc<x12_schema::TransactionSetDef>> {
            None
        }
        fn segment_dict(&self, version: &str) -> Option<Arc<SegmentDict>> {
            (version == self.root.version).then(|| self.dict.clone())
        }
        fn element_def(&self, _id: &str) -> Option<Arc<ElementDef>> {
            None
        }
    }

    const ISA: &[u8] = b"ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *231213*1430*^*00501*000000001*0*P*:~";

    #[test]
    fn minimal_interchange_has_no_errors() {
        let (root, dict) = bare_interchange();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"IEA*0*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert!(outcome.errors.is_empty());
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.children().len(), 2);
        assert!(tree.segment("ISA", 0).is_some());
        assert!(tree.segment("IEA", 0).is_some());
    }

    #[test]
    fn missing_trailer_reports_exactly_one_error() {
        let (root, dict) = bare_interchange();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let bytes = ISA.to_vec();

        let outcome = parse(&bytes, &root, &catalog);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            StructuralError::MissingMandatory { child, .. } if child == "IEA"
        ));
        assert!(outcome.tree.is_some());
    }

    #[test]
    fn unexpected_segment_at_root_is_reported_and_skipped() {
        let (root, dict) = bare_interchange();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"NM1*IL*1*DOE*JOHN~");
        bytes.extend_from_slice(b"IEA*0*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            StructuralError::UnexpectedSegment { segment_id, .. } if segment_id == "NM1"
        ));
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.children().len(), 2);
    }

    #[test]
    fn unknown_segment_is_reported_and_skipped() {
        let (root, dict) = bare_interchange();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"ZZZ*1~");
        bytes.extend_from_slice(b"IEA*0*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(&outcome.errors[0], StructuralError::UnknownSegment { .. }));
    }

    #[test]
    fn nested_functional_group_and_loop_are_constructed() {
        let (root, dict) = interchange_with_groups();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"GS*HC*SENDER*RECEIVER*20231213*1430*1*X*005010X222A1~");
        bytes.extend_from_slice(b"NM1*IL*DOE~");
        bytes.extend_from_slice(b"GE*1*1~");
        bytes.extend_from_slice(b"IEA*1*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        let tree = outcome.tree.unwrap();
        let fg = tree.segment("HC", 0).expect("functional group by functional id code");
        assert!(fg.segment("GS", 0).is_some());
        assert!(fg.segment("GE", 0).is_some());
        let loop_node = fg.segment("NM1LOOP", 0).expect("nm1 loop by loop id");
        let nm1 = loop_node.segment("NM1", 0).unwrap();
        assert_eq!(nm1.element(1).unwrap().value().unwrap().to_wire(true), "IL");
    }

    #[test]
    fn loop_repetition_overflow_is_reported_and_dropped() {
        let (root, dict) = interchange_with_groups();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"GS*HC*SENDER*RECEIVER*20231213*1430*1*X*005010X222A1~");
        bytes.extend_from_slice(b"NM1*IL*ONE~");
        bytes.extend_from_slice(b"NM1*IL*TWO~");
        bytes.extend_from_slice(b"NM1*IL*THREE~");
        bytes.extend_from_slice(b"GE*1*1~");
        bytes.extend_from_slice(b"IEA*1*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(&outcome.errors[0], StructuralError::TooManyRepetitions { .. }));
        let tree = outcome.tree.unwrap();
        let fg = tree.segment("HC", 0).unwrap();
        let loops: Vec<&Node> = fg.children().iter().filter(|c| c.name == "NM1LOOP").collect();
        assert_eq!(loops.len(), 2);
    }

    #[test]
    fn missing_mandatory_element_is_reported() {
        let (root, dict) = interchange_with_groups();
        let catalog = FixtureCatalog { root: root.clone(), dict };
        let mut bytes = ISA.to_vec();
        bytes.extend_from_slice(b"GS*HC*SENDER*RECEIVER*20231213*1430*1*X*005010X222A1~");
        bytes.extend_from_slice(b"NM1**DOE~");
        bytes.extend_from_slice(b"GE*1*1~");
        bytes.extend_from_slice(b"IEA*1*000000001~");

        let outcome = parse(&bytes, &root, &catalog);
        assert!(outcome
            .errors
            .iter()
            .any(|e| matches!(e, StructuralError::MissingMandatoryElement { element_position: 1, .. })));
    }
}
