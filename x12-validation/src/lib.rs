//! Structural envelope consistency checks (ambient enrichment): control
//! number cross-references and segment counts that only make sense once
//! a whole interchange, functional group, or transaction set has been
//! constructed, the kind of check X12 implementers call SNIP level 7.
//!
//! Business-rule and code-set validation are out of scope; these checks
//! are pure functions of the tree's own structure and values.

mod envelope;
mod error;

pub use envelope::{EnvelopeValidator, Validator};
pub use error::{ErrorKind, ValidationError};

/// Runs every registered validator over `tree`, accumulating every
/// error rather than stopping at the first.
pub struct ValidationSuite {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationSuite {
    pub fn new() -> Self {
        Self { validators: Vec::new() }
    }

    /// A suite carrying every validator this crate currently defines.
    pub fn full() -> Self {
        let mut suite = Self::new();
        suite.add(Box::new(EnvelopeValidator::new()));
        suite
    }

    pub fn add(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn validate(&self, tree: &x12_tree::Node) -> Vec<ValidationError> {
        self.validators.iter().flat_map(|v| v.validate(tree)).collect()
    }
}

impl Default for ValidationSuite {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use x12_schema::{ElementDef, ElementKind as SchemaKind, Usage};
    use x12_tokenizer::{Position, Separators};
    use x12_tree::{Node, NodeKind};
    use x12_value::read_value;

    fn separators() -> Arc<Separators> {
        Arc::new(Separators::default())
    }

    fn numeric_element(id: &str, raw: &str) -> Node {
        let def = ElementDef::new(id, id, 1, 9, SchemaKind::Numeric { precision: 0 }).unwrap();
        let value = read_value(raw, def, Usage::Mandatory, Position::default());
        Node::leaf(id, Usage::Mandatory, Position::default(), separators(), value)
    }

    fn segment(id: &str, elements: Vec<Node>) -> Node {
        Node::branch(NodeKind::Segment, id, Usage::Mandatory, Position::default(), separators(), elements)
    }

    fn isa(control: &str) -> Node {
        let mut elements: Vec<Node> = (1..=12).map(|i| numeric_element(&format!("ISA{i:02}"), "0")).collect();
        elements.push(numeric_element("ISA13", control));
        segment("ISA", elements)
    }

    fn iea(control: &str) -> Node {
        segment("IEA", vec![numeric_element("IEA01", "1"), numeric_element("IEA02", control)])
    }

    fn st(control: &str) -> Node {
        segment("ST", vec![numeric_element("ST01", "837"), numeric_element("ST02", control)])
    }

    fn se(count: &str, control: &str) -> Node {
        segment("SE", vec![numeric_element("SE01", count), numeric_element("SE02", control)])
    }

    fn transaction_set(control: &str, count: &str, body: Vec<Node>) -> Node {
        let mut children = vec![st(control)];
        children.extend(body);
        children.push(se(count, control));
        Node::branch(NodeKind::TransactionSet, "837", Usage::Mandatory, Position::default(), separators(), children)
    }

    fn functional_group(transaction_sets: Vec<Node>) -> Node {
        Node::branch(
            NodeKind::FunctionalGroup,
            "HC",
            Usage::Mandatory,
            Position::default(),
            separators(),
            transaction_sets,
        )
    }

    fn interchange(isa_control: &str, iea_control: &str, groups: Vec<Node>) -> Node {
        let mut children = vec![isa(isa_control)];
        children.extend(groups);
        children.push(iea(iea_control));
        Node::branch(NodeKind::Interchange, "ISA", Usage::Mandatory, Position::default(), separators(), children)
    }

    #[test]
    fn clean_envelope_has_no_errors() {
        let ts = transaction_set("0001", "2", vec![]);
        let tree = interchange("000000001", "000000001", vec![functional_group(vec![ts])]);
        let errors = EnvelopeValidator::new().validate(&tree);
        assert!(errors.is_empty());
    }

    #[test]
    fn detects_iea_control_mismatch() {
        let tree = interchange("000000001", "000000002", vec![]);
        let errors = EnvelopeValidator::new().validate(&tree);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::ControlNumberMismatch);
        assert_eq!(errors[0].segment_id, "IEA");
    }

    #[test]
    fn detects_se_segment_count_mismatch() {
        let ts = transaction_set("0001", "5", vec![]);
        let tree = interchange("1", "1", vec![functional_group(vec![ts])]);
        let errors = EnvelopeValidator::new().validate(&tree);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::SegmentCountMismatch);
    }

    #[test]
    fn counts_segments_nested_under_loops() {
        let nm1 = segment("NM1", vec![numeric_element("NM101", "1")]);
        let loop_node =
            Node::branch(NodeKind::Loop, "NM1LOOP", Usage::Optional, Position::default(), separators(), vec![nm1]);
        let ts = transaction_set("0001", "3", vec![loop_node]);
        let tree = interchange("1", "1", vec![functional_group(vec![ts])]);
        let errors = EnvelopeValidator::new().validate(&tree);
        assert!(errors.is_empty());
    }

    #[test]
    fn suite_aggregates_validator_errors() {
        let tree = interchange("1", "2", vec![]);
        let suite = ValidationSuite::full();
        let errors = suite.validate(&tree);
        assert_eq!(errors.len(), 1);
    }
}
