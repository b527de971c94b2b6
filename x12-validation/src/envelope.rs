use x12_tree::{Node, NodeKind};

use crate::error::{ErrorKind, ValidationError};

/// Walks a constructed document tree checking the envelope cross-checks
/// the wire format alone cannot express: a trailer's control number must
/// echo its opener's, and a transaction set's `SE01` must match the
/// segments actually between its `ST` and `SE`. These are structural,
/// not business-rule, checks: the schema already guarantees segment
/// order and presence, so correctness here is a pure function of the
/// tree's own element values.
pub trait Validator {
    fn validate(&self, tree: &Node) -> Vec<ValidationError>;

    fn name(&self) -> &str;
}

/// The sole validator of this crate: interchange, functional-group, and
/// transaction-set envelope consistency.
pub struct EnvelopeValidator;

impl EnvelopeValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvelopeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EnvelopeValidator {
    fn validate(&self, tree: &Node) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_interchange(tree, &mut errors);
        errors
    }

    fn name(&self) -> &str {
        "envelope consistency"
    }
}

fn check_interchange(interchange: &Node, errors: &mut Vec<ValidationError>) {
    if let (Some(isa), Some(iea)) = (interchange.segment("ISA", 0), interchange.segment("IEA", 0)) {
        check_control_numbers(isa, 13, iea, 2, "IEA", errors);
    }
    for functional_group in interchange.children().iter().filter(|c| c.kind == NodeKind::FunctionalGroup) {
        check_functional_group(functional_group, errors);
    }
}

fn check_functional_group(group: &Node, errors: &mut Vec<ValidationError>) {
    if let (Some(gs), Some(ge)) = (group.segment("GS", 0), group.segment("GE", 0)) {
        check_control_numbers(gs, 6, ge, 2, "GE", errors);
    }
    for transaction_set in group.children().iter().filter(|c| c.kind == NodeKind::TransactionSet) {
        check_transaction_set(transaction_set, errors);
    }
}

fn check_transaction_set(transaction_set: &Node, errors: &mut Vec<ValidationError>) {
    let (Some(st), Some(se)) = (transaction_set.segment("ST", 0), transaction_set.segment("SE", 0)) else {
        return;
    };
    check_control_numbers(st, 2, se, 2, "SE", errors);

    let declared = se.element(1).and_then(numeric_value);
    let actual = count_segments(transaction_set);
    if let Some(declared) = declared {
        if declared != actual as u64 {
            errors.push(ValidationError {
                kind: ErrorKind::SegmentCountMismatch,
                segment_id: "SE".to_string(),
                message: format!("SE01 declares {declared} segments, found {actual}"),
                position: se.position,
            });
        }
    }
}

fn check_control_numbers(
    opener: &Node,
    opener_position: usize,
    trailer: &Node,
    trailer_position: usize,
    trailer_id: &str,
    errors: &mut Vec<ValidationError>,
) {
    let opener_value = opener.element(opener_position).and_then(numeric_value);
    let trailer_value = trailer.element(trailer_position).and_then(numeric_value);
    if let (Some(o), Some(t)) = (opener_value, trailer_value) {
        if o != t {
            errors.push(ValidationError {
                kind: ErrorKind::ControlNumberMismatch,
                segment_id: trailer_id.to_string(),
                message: format!("{trailer_id}{trailer_position:02} ({t}) does not match {}{opener_position:02} ({o})", opener.name),
                position: trailer.position,
            });
        }
    }
}

fn numeric_value(element: &Node) -> Option<u64> {
    let value = element.value()?;
    let raw = value.to_wire(true);
    let trimmed = raw.trim().trim_start_matches('0');
    if trimmed.is_empty() && !raw.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}

/// Counts `Segment` nodes in `node`'s subtree, descending through loops
/// but not into other transaction sets or functional groups (neither can
/// nest inside a transaction set, but the guard keeps this correct if
/// that ever changed).
fn count_segments(node: &Node) -> usize {
    match node.kind {
        NodeKind::Segment => 1 + node.children().iter().map(count_segments).sum::<usize>(),
        NodeKind::Loop => node.children().iter().map(count_segments).sum(),
        NodeKind::TransactionSet => node.children().iter().map(count_segments).sum(),
        _ => 0,
    }
}
