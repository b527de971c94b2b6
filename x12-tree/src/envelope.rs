use std::sync::Arc;

use x12_tokenizer::Separators;
use x12_value::read_value;

use crate::change::FieldChange;
use crate::node::{Node, NodeKind};

const REPETITION_POSITION: usize = 11;
const COMPONENT_POSITION: usize = 16;

/// Rewrites an ISA segment node's wire-level representation under
/// `new_separators`, touching only elements 11 (repetition separator
/// character) and 16 (component separator character) and swapping the
/// node's separators handle. The value tree is not otherwise
/// regenerated (`spec.md` §4.5).
///
/// Panics if `isa` is not a `Segment` node with at least 16 elements;
/// callers are expected to pass an actual ISA segment node.
pub fn replace_separators(isa: &Node, new_separators: Arc<Separators>) -> Node {
    assert_eq!(isa.kind, NodeKind::Segment, "replace_separators expects an ISA segment node");

    let rewrite = |position: usize, new_char: u8, separators: &Arc<Separators>| -> FieldChange {
        let slot = isa
            .element(position)
            .unwrap_or_else(|| panic!("ISA element {position} is missing"));
        let current = slot
            .value()
            .unwrap_or_else(|| panic!("ISA element {position} is not a simple value"));
        let rendered = (new_char as char).to_string();
        let replaced = read_value(&rendered, current.definition().clone(), current.usage(), *current.position());
        FieldChange::Element {
            position,
            node: Node::leaf(slot.name.clone(), slot.usage, slot.position, separators.clone(), replaced),
        }
    };

    let repetition_change = rewrite(REPETITION_POSITION, new_separators.repetition, &new_separators);
    let component_change = rewrite(COMPONENT_POSITION, new_separators.component, &new_separators);

    isa.copy(&[
        repetition_change,
        component_change,
        FieldChange::Separators(new_separators),
    ])
}
