//! Constructed-tree to byte-stream writer (component C7): a pre-order
//! traversal that renders each segment under the document's own
//! separators, the mirror image of `x12-parser`'s reduction.

use x12_tree::{Leaf, Node, NodeKind};

/// Renders `tree` to its wire-format byte stream, honoring whatever
/// `Separators` the tree itself carries (`Node::separators`, set when the
/// tree was constructed or after [`x12_tree::replace_separators`]).
///
/// Container nodes (interchange/functional-group/transaction-set/loop)
/// contribute no delimiters of their own: each segment terminates
/// itself. Element values are rendered via `to_wire(truncate = true)`:
/// composites join components with the component delimiter, repeated
/// elements join occurrences with the repetition delimiter, and trailing
/// optional elements that render empty are omitted from a segment (never
/// a middle one, which would shift every later position).
pub fn write(tree: &Node) -> Vec<u8> {
    let mut out = Vec::new();
    render_node(tree, &mut out);
    out
}

fn render_node(node: &Node, out: &mut Vec<u8>) {
    match node.kind {
        NodeKind::Segment => render_segment(node, out),
        NodeKind::Composite | NodeKind::Element => {
            unreachable!("composite/element nodes are rendered inline by their parent segment")
        }
        NodeKind::Interchange | NodeKind::FunctionalGroup | NodeKind::TransactionSet | NodeKind::Loop => {
            for child in node.children() {
                render_node(child, out);
            }
        }
    }
}

fn render_segment(node: &Node, out: &mut Vec<u8>) {
    let separators = &node.separators;
    let children = node.children();
    let mut fields: Vec<String> = children.iter().map(render_element_slot).collect();

    while let Some(last) = children.get(fields.len().wrapping_sub(1)) {
        if fields.is_empty() {
            break;
        }
        if is_droppable_trailing(last) {
            fields.pop();
        } else {
            break;
        }
    }

    out.extend_from_slice(node.name.as_bytes());
    for field in &fields {
        out.push(separators.element);
        out.extend_from_slice(field.as_bytes());
    }
    out.push(separators.segment);
}

fn render_element_slot(node: &Node) -> String {
    match node.kind {
        NodeKind::Composite => {
            let separator = node.separators.component as char;
            node.children()
                .iter()
                .map(render_element_slot)
                .collect::<Vec<_>>()
                .join(&separator.to_string())
        }
        NodeKind::Element => match node.leaf_value() {
            Some(Leaf::Single(v)) => v.to_wire(true),
            Some(Leaf::Repeated(values)) => {
                let separator = (node.separators.repetition as char).to_string();
                values.iter().map(|v| v.to_wire(true)).collect::<Vec<_>>().join(&separator)
            }
            None => String::new(),
        },
        _ => String::new(),
    }
}

fn is_empty_value(node: &Node) -> bool {
    match node.kind {
        NodeKind::Composite => node.children().iter().all(is_empty_value),
        NodeKind::Element => match node.leaf_value() {
            Some(Leaf::Single(v)) => v.is_empty(),
            Some(Leaf::Repeated(values)) => values.iter().all(|v| v.is_empty()),
            None => true,
        },
        _ => true,
    }
}

fn is_droppable_trailing(node: &Node) -> bool {
    !node.usage.required() && is_empty_value(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use x12_schema::{ElementDef, ElementKind as SchemaKind, Usage};
    use x12_tokenizer::{Position, Separators};
    use x12_value::read_value;

    fn separators() -> Arc<Separators> {
        Arc::new(Separators::default())
    }

    fn element(id: &str, min: u16, max: u16, usage: Usage, raw: &str) -> Node {
        let def = ElementDef::new(id, id, min, max, SchemaKind::AlphaNumeric).unwrap();
        let value = read_value(raw, def, usage, Position::default());
        Node::leaf(id, usage, Position::default(), separators(), value)
    }

    fn segment(id: &str, usage: Usage, children: Vec<Node>) -> Node {
        Node::branch(NodeKind::Segment, id, usage, Position::default(), separators(), children)
    }

    #[test]
    fn renders_a_simple_segment() {
        let seg = segment(
            "NM1",
            Usage::Mandatory,
            vec![
                element("NM101", 2, 3, Usage::Mandatory, "IL"),
                element("NM102", 1, 1, Usage::Mandatory, "1"),
                element("NM103", 1, 60, Usage::Mandatory, "DOE"),
            ],
        );
        assert_eq!(write(&seg), b"NM1*IL*1*DOE~".to_vec());
    }

    #[test]
    fn omits_only_trailing_empty_optionals() {
        let seg = segment(
            "N1",
            Usage::Mandatory,
            vec![
                element("N101", 2, 3, Usage::Mandatory, "40"),
                element("N102", 1, 60, Usage::Optional, ""),
                element("N103", 1, 2, Usage::Optional, ""),
                element("N104", 1, 1, Usage::Optional, ""),
            ],
        );
        assert_eq!(write(&seg), b"N1*40~".to_vec());
    }

    #[test]
    fn does_not_drop_a_middle_empty_optional() {
        let seg = segment(
            "N1",
            Usage::Mandatory,
            vec![
                element("N101", 2, 3, Usage::Mandatory, "40"),
                element("N102", 1, 60, Usage::Optional, ""),
                element("N103", 1, 2, Usage::Optional, "91"),
            ],
        );
        assert_eq!(write(&seg), b"N1*40**91~".to_vec());
    }

    #[test]
    fn never_drops_a_trailing_mandatory_even_if_empty() {
        let seg = segment(
            "XX",
            Usage::Mandatory,
            vec![
                element("XX01", 1, 3, Usage::Mandatory, "A"),
                element("XX02", 1, 3, Usage::Mandatory, ""),
            ],
        );
        assert_eq!(write(&seg), b"XX*A*~".to_vec());
    }

    #[test]
    fn renders_composite_and_repeated_elements() {
        let composite = Node::branch(
            NodeKind::Composite,
            "C1",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![
                element("C101", 1, 3, Usage::Mandatory, "ACK"),
                element("C102", 1, 3, Usage::Optional, "001"),
            ],
        );
        let repeated = Node::repeated_leaf(
            "E1",
            Usage::Optional,
            Position::default(),
            separators(),
            vec![
                read_value("A", ElementDef::new("E1", "E1", 1, 3, SchemaKind::AlphaNumeric).unwrap(), Usage::Optional, Position::default()),
                read_value("B", ElementDef::new("E1", "E1", 1, 3, SchemaKind::AlphaNumeric).unwrap(), Usage::Optional, Position::default()),
            ],
        );
        let seg = segment("AK9", Usage::Mandatory, vec![composite, repeated]);
        assert_eq!(write(&seg), b"AK9*ACK:001*A^B~".to_vec());
    }

    #[test]
    fn concatenates_container_children_without_extra_delimiters() {
        let st = segment("ST", Usage::Mandatory, vec![element("ST01", 3, 3, Usage::Mandatory, "837")]);
        let se = segment("SE", Usage::Mandatory, vec![element("SE01", 1, 1, Usage::Mandatory, "1")]);
        let ts = Node::branch(
            NodeKind::TransactionSet,
            "837",
            Usage::Mandatory,
            Position::default(),
            separators(),
            vec![st, se],
        );
        assert_eq!(write(&ts), b"ST*837~SE*1~".to_vec());
    }

    #[test]
    fn honors_custom_separators() {
        let custom = Arc::new(
            Separators::default()
                .with_element(b'|')
                .unwrap()
                .with_segment(b'!')
                .unwrap(),
        );
        let def = ElementDef::new("E1", "E1", 1, 3, SchemaKind::AlphaNumeric).unwrap();
        let value = read_value("IL", def, Usage::Mandatory, Position::default());
        let leaf = Node::leaf("E1", Usage::Mandatory, Position::default(), custom.clone(), value);
        let seg = Node::branch(NodeKind::Segment, "NM1", Usage::Mandatory, Position::default(), custom, vec![leaf]);
        assert_eq!(write(&seg), b"NM1|IL!".to_vec());
    }

    proptest::proptest! {
        #[test]
        fn numeric_wire_round_trip(n in -999_999i64..999_999i64) {
            let precision = 2u8;
            let min_length = 1u16;
            let max_length = 8u16;
            let def = ElementDef::new("AMT02", "Amount", min_length, max_length, SchemaKind::Numeric { precision }).unwrap();
            let magnitude = n.unsigned_abs().to_string();
            let padded = format!("{:0>width$}", magnitude, width = min_length as usize);
            let raw = if n < 0 { format!("-{padded}") } else { padded };

            let value = read_value(&raw, def.clone(), Usage::Mandatory, Position::default());
            let leaf = Node::leaf("AMT02", Usage::Mandatory, Position::default(), separators(), value);
            let seg = segment("AMT", Usage::Mandatory, vec![leaf]);

            let rendered = write(&seg);
            let rendered_field = std::str::from_utf8(&rendered).unwrap()
                .trim_start_matches("AMT*")
                .trim_end_matches('~');
            prop_assert_eq!(rendered_field, raw.trim_start_matches('+'));
        }
    }
}
