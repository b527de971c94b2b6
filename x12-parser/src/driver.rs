use std::sync::Arc;

use x12_schema::{ChildDef, SegmentDict, Usage};
use x12_tokenizer::{Position, Separators, SegmentTok};
use x12_tree::Node;

use crate::element::build_segment_node;
use crate::error::StructuralError;
use crate::frame::{ContainerDef, Frame};

/// Places one token against the open zipper, per `spec.md` §4.6.
///
/// Returns `Some(node)` only when this token closed the interchange's own
/// trailer, i.e. the whole document is now fully constructed.
pub(crate) fn place_token(
    stack: &mut Vec<Frame>,
    tok: &SegmentTok<'_>,
    dict: Option<&SegmentDict>,
    separators: &Arc<Separators>,
    errors: &mut Vec<StructuralError>,
) -> Option<Node> {
    let tok_id = tok.id_str().unwrap_or("");
    let known = tok.id_well_formed && dict.map(|d| d.lookup(tok_id).is_some()).unwrap_or(false);
    if !known {
        errors.push(StructuralError::UnknownSegment {
            segment_id: tok_id.to_string(),
            position: tok.position,
        });
        return None;
    }

    loop {
        let frame = stack.last().expect("place_token called with an empty zipper");
        let trailer_matches = frame.container.trailer().map(|t| t.id == tok_id).unwrap_or(false);
        if trailer_matches {
            return close_frame(stack, Some(tok), separators, errors);
        }

        // A loop's trigger segment reappearing always starts a new
        // occurrence of the loop, never a second copy of its own first
        // child within the instance already open, so a currently-open
        // loop whose trigger has already fired once defers to its parent
        // instead of matching itself again.
        let restarts_open_loop = match &frame.container {
            ContainerDef::Loop(l) => l.trigger_id() == Some(tok_id) && frame.counts.first().copied().unwrap_or(0) >= 1,
            _ => false,
        };
        if restarts_open_loop && stack.len() > 1 {
            close_frame(stack, None, separators, errors);
            continue;
        }

        let frame = stack.last_mut().expect("place_token called with an empty zipper");
        match find_or_advance(frame, tok_id, errors, tok.position) {
            Some(index) => {
                let child = frame.children_defs[index].clone();
                if !child.repeat_count.allows(frame.counts[index]) {
                    errors.push(StructuralError::TooManyRepetitions {
                        parent: frame.name(),
                        child: child.child.name().to_string(),
                        position: tok.position,
                    });
                    return None;
                }
                frame.counts[index] += 1;

                match child.child {
                    ChildDef::Segment(def) => {
                        let node = build_segment_node(tok, &def, child.usage, separators.clone(), errors);
                        frame.matched.push(node);
                        return None;
                    }
                    ChildDef::Loop(def) => {
                        stack.push(Frame::new(ContainerDef::Loop(def), child.usage, tok.position));
                        continue;
                    }
                    ChildDef::TransactionSet(def) => {
                        let header = def.header.clone();
                        let mut opened = Frame::new(ContainerDef::TransactionSet(def), child.usage, tok.position);
                        opened
                            .matched
                            .push(build_segment_node(tok, &header, Usage::Mandatory, separators.clone(), errors));
                        stack.push(opened);
                        return None;
                    }
                    ChildDef::FunctionalGroup(def) => {
                        let header = def.header.clone();
                        let mut opened = Frame::new(ContainerDef::FunctionalGroup(def), child.usage, tok.position);
                        opened
                            .matched
                            .push(build_segment_node(tok, &header, Usage::Mandatory, separators.clone(), errors));
                        stack.push(opened);
                        return None;
                    }
                }
            }
            None => {
                if stack.len() == 1 {
                    errors.push(StructuralError::UnexpectedSegment {
                        segment_id: tok_id.to_string(),
                        position: tok.position,
                    });
                    return None;
                }
                close_frame(stack, None, separators, errors);
            }
        }
    }
}

/// Scans the current frame's declared children from its cursor forward for
/// one whose trigger id matches `tok_id`, advancing the cursor to that
/// position. Any mandatory child skipped along the way that has not yet
/// been satisfied is reported as missing.
fn find_or_advance(
    frame: &mut Frame,
    tok_id: &str,
    errors: &mut Vec<StructuralError>,
    position: Position,
) -> Option<usize> {
    let mut i = frame.cursor;
    while i < frame.children_defs.len() {
        if frame.children_defs[i].child.trigger_id() == Some(tok_id) {
            for j in frame.cursor..i {
                let skipped = &frame.children_defs[j];
                if skipped.usage.required() && frame.counts[j] == 0 {
                    errors.push(StructuralError::MissingMandatory {
                        parent: frame.name(),
                        child: skipped.child.name().to_string(),
                        position,
                    });
                }
            }
            frame.cursor = i;
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Closes the innermost frame: reports any never-satisfied mandatory
/// children still left, builds the trailer node if `trailer_tok` matched
/// one (or reports it missing if not), and appends the finished node to
/// the parent frame, or, if this was the interchange itself, returns it.
pub(crate) fn close_frame(
    stack: &mut Vec<Frame>,
    trailer_tok: Option<&SegmentTok<'_>>,
    separators: &Arc<Separators>,
    errors: &mut Vec<StructuralError>,
) -> Option<Node> {
    let mut frame = stack.pop().expect("close_frame called on an empty zipper");
    let position = trailer_tok.map(|t| t.position).unwrap_or(frame.position);

    for j in frame.cursor..frame.children_defs.len() {
        let child = &frame.children_defs[j];
        if child.usage.required() && frame.counts[j] == 0 {
            errors.push(StructuralError::MissingMandatory {
                parent: frame.name(),
                child: child.child.name().to_string(),
                position,
            });
        }
    }

    match trailer_tok {
        Some(tok) => {
            if let Some(trailer_def) = frame.container.trailer().cloned() {
                let node = build_segment_node(tok, &trailer_def, Usage::Mandatory, separators.clone(), errors);
                frame.matched.push(node);
            }
        }
        None => {
            if let Some(trailer_def) = frame.container.trailer() {
                errors.push(StructuralError::MissingMandatory {
                    parent: frame.name(),
                    child: trailer_def.id.clone(),
                    position,
                });
            }
        }
    }

    let node = Node::branch(
        frame.container.node_kind(),
        frame.name(),
        frame.usage,
        frame.position,
        separators.clone(),
        frame.matched,
    );

    match stack.last_mut() {
        Some(parent) => {
            parent.matched.push(node);
            None
        }
        None => Some(node),
    }
}
