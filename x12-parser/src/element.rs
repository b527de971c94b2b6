use std::sync::Arc;

use x12_schema::{ComponentUse, CompositeDef, ElementUse, ElementUseDef, RepeatCount, SegmentDef, Usage};
use x12_tokenizer::{ElementShape, ElementTok, Position, Separators, SegmentTok};
use x12_tree::{Node, NodeKind};
use x12_value::read_value;

use crate::error::StructuralError;

/// Builds a `Segment` node from a token, zipping its element slots against
/// the definition's dense, 1-indexed element list. One child is emitted
/// per declared position regardless of whether the wire data supplied it,
/// so `Node::element(i)` always names the same definition position.
pub(crate) fn build_segment_node(
    tok: &SegmentTok<'_>,
    def: &Arc<SegmentDef>,
    usage: Usage,
    separators: Arc<Separators>,
    errors: &mut Vec<StructuralError>,
) -> Node {
    let children: Vec<Node> = def
        .elements
        .iter()
        .map(|use_| {
            build_element_use(
                tok.element(use_.position as usize),
                use_,
                &def.id,
                tok.position,
                separators.clone(),
                errors,
            )
        })
        .collect();
    Node::branch(NodeKind::Segment, def.id.clone(), usage, tok.position, separators, children)
}

fn shape_text(shape: &ElementShape<'_>) -> String {
    match shape {
        ElementShape::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ElementShape::Composite(parts) => parts
            .first()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default(),
    }
}

fn component_slices<'a>(shape: &ElementShape<'a>) -> Vec<&'a [u8]> {
    match shape {
        ElementShape::Simple(bytes) => vec![*bytes],
        ElementShape::Composite(parts) => parts.clone(),
    }
}

fn repeat_limit(repeat_count: RepeatCount) -> usize {
    match repeat_count {
        RepeatCount::Bounded(n) => n as usize,
        RepeatCount::Unbounded => usize::MAX,
    }
}

fn element_position(el_tok: Option<&ElementTok<'_>>, segment_position: Position, use_position: u16) -> Position {
    el_tok
        .map(|e| e.position)
        .unwrap_or_else(|| segment_position.element(use_position as usize - 1))
}

fn build_element_use(
    el_tok: Option<&ElementTok<'_>>,
    use_: &ElementUse,
    segment_id: &str,
    segment_position: Position,
    separators: Arc<Separators>,
    errors: &mut Vec<StructuralError>,
) -> Node {
    let position = element_position(el_tok, segment_position, use_.position);
    let repetitions: &[ElementShape<'_>] = el_tok.map(|e| e.repetitions.as_slice()).unwrap_or(&[]);
    let present = !repetitions.is_empty() && !repetitions.iter().all(ElementShape::is_empty);

    match &use_.definition {
        ElementUseDef::Element(def) => {
            if !present {
                if use_.usage.required() {
                    errors.push(StructuralError::MissingMandatoryElement {
                        segment: segment_id.to_string(),
                        element_position: use_.position,
                        position,
                    });
                }
                let value = read_value("", def.clone(), use_.usage, position);
                return Node::leaf(def.id.clone(), use_.usage, position, separators, value);
            }

            let repeated_slot = !matches!(use_.repeat_count, RepeatCount::Bounded(1));
            if !repeated_slot {
                if repetitions.len() > 1 {
                    errors.push(StructuralError::TooManyRepetitions {
                        parent: segment_id.to_string(),
                        child: def.id.clone(),
                        position,
                    });
                }
                let raw = shape_text(&repetitions[0]);
                let value = read_value(&raw, def.clone(), use_.usage, position);
                return Node::leaf(def.id.clone(), use_.usage, position, separators, value);
            }

            let allowed = repeat_limit(use_.repeat_count);
            if repetitions.len() > allowed {
                errors.push(StructuralError::TooManyRepetitions {
                    parent: segment_id.to_string(),
                    child: def.id.clone(),
                    position,
                });
            }
            let used = repetitions.len().min(allowed);
            let values = repetitions[..used]
                .iter()
                .map(|shape| read_value(&shape_text(shape), def.clone(), use_.usage, position))
                .collect();
            Node::repeated_leaf(def.id.clone(), use_.usage, position, separators, values)
        }
        ElementUseDef::Composite(def) => {
            if !present {
                if use_.usage.required() {
                    errors.push(StructuralError::MissingMandatoryElement {
                        segment: segment_id.to_string(),
                        element_position: use_.position,
                        position,
                    });
                }
                let children = build_composite_components(def, None, position, separators.clone(), errors);
                return Node::branch(NodeKind::Composite, def.id.clone(), use_.usage, position, separators, children);
            }
            if repetitions.len() > 1 {
                errors.push(StructuralError::TooManyRepetitions {
                    parent: segment_id.to_string(),
                    child: def.id.clone(),
                    position,
                });
            }
            let children = build_composite_components(def, Some(&repetitions[0]), position, separators.clone(), errors);
            Node::branch(NodeKind::Composite, def.id.clone(), use_.usage, position, separators, children)
        }
    }
}

fn build_composite_components(
    def: &Arc<CompositeDef>,
    shape: Option<&ElementShape<'_>>,
    base_position: Position,
    separators: Arc<Separators>,
    errors: &mut Vec<StructuralError>,
) -> Vec<Node> {
    let components = shape.map(component_slices).unwrap_or_default();
    def.components
        .iter()
        .map(|cu: &ComponentUse| {
            let position = base_position.component(cu.position as usize - 1);
            let raw = components
                .get(cu.position as usize - 1)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            if raw.is_empty() && cu.usage.required() {
                errors.push(StructuralError::MissingMandatoryElement {
                    segment: def.id.clone(),
                    element_position: cu.position,
                    position,
                });
            }
            let value = read_value(&raw, cu.definition.clone(), cu.usage, position);
            Node::leaf(cu.definition.id.clone(), cu.usage, position, separators.clone(), value)
        })
        .collect()
}
