use std::sync::Arc;

use crate::error::SchemaError;
use crate::segment::{ChildUse, SegmentDef, SegmentDict};

/// Shared lookup behavior for any schema node holding a dense, 1-indexed
/// list of [`ChildUse`]s (loop, transaction set, functional group,
/// interchange).
pub trait ChildContainer {
    fn children(&self) -> &[ChildUse];

    fn child_at(&self, position: u16) -> Result<&ChildUse, SchemaError> {
        position
            .checked_sub(1)
            .and_then(|i| self.children().get(i as usize))
            .ok_or(SchemaError::OutOfRange {
                position,
                len: self.children().len(),
            })
    }
}

/// Shared lookup behavior for any schema node holding a dense, 1-indexed
/// list of element-like uses (segment, composite). Segments and composites
/// already expose `element_at`/`component_at` directly; this trait exists
/// for generic code in `x12-parser` that needs to walk either uniformly.
pub trait ElementContainer {
    type Use;
    fn uses(&self) -> &[Self::Use];
}

/// A repeatable grouping of segments and nested loops, keyed by the
/// tag of its first (trigger) segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopDef {
    pub id: String,
    pub name: String,
    pub children: Vec<ChildUse>,
}

impl LoopDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<ChildUse>,
    ) -> Result<Arc<Self>, SchemaError> {
        let id = id.into();
        crate::dense::assert_dense(&id, children.iter().map(|c| c.position))?;
        Ok(Arc::new(Self {
            id,
            name: name.into(),
            children,
        }))
    }

    /// The segment id that opens this loop: the trigger id of its first
    /// declared child.
    pub fn trigger_id(&self) -> Option<&str> {
        self.children.first().and_then(|c| c.child.trigger_id())
    }
}

impl ChildContainer for LoopDef {
    fn children(&self) -> &[ChildUse] {
        &self.children
    }
}

/// A transaction set: header/trailer segments (`ST`/`SE`) bracketing an
/// ordered list of segments and loops.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSetDef {
    /// e.g. `"837"`.
    pub id: String,
    pub name: String,
    pub header: Arc<SegmentDef>,
    pub trailer: Arc<SegmentDef>,
    pub children: Vec<ChildUse>,
}

impl TransactionSetDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        header: Arc<SegmentDef>,
        trailer: Arc<SegmentDef>,
        children: Vec<ChildUse>,
    ) -> Result<Arc<Self>, SchemaError> {
        let id = id.into();
        crate::dense::assert_dense(&id, children.iter().map(|c| c.position))?;
        Ok(Arc::new(Self {
            id,
            name: name.into(),
            header,
            trailer,
            children,
        }))
    }
}

impl ChildContainer for TransactionSetDef {
    fn children(&self) -> &[ChildUse] {
        &self.children
    }
}

/// A functional group: header/trailer segments (`GS`/`GE`) bracketing
/// one or more transaction sets of a single functional id code.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalGroupDef {
    /// e.g. `"HC"` for health care claims.
    pub functional_id_code: String,
    pub name: String,
    pub header: Arc<SegmentDef>,
    pub trailer: Arc<SegmentDef>,
    pub children: Vec<ChildUse>,
}

impl FunctionalGroupDef {
    pub fn new(
        functional_id_code: impl Into<String>,
        name: impl Into<String>,
        header: Arc<SegmentDef>,
        trailer: Arc<SegmentDef>,
        children: Vec<ChildUse>,
    ) -> Result<Arc<Self>, SchemaError> {
        let functional_id_code = functional_id_code.into();
        crate::dense::assert_dense(&functional_id_code, children.iter().map(|c| c.position))?;
        Ok(Arc::new(Self {
            functional_id_code,
            name: name.into(),
            header,
            trailer,
            children,
        }))
    }
}

impl ChildContainer for FunctionalGroupDef {
    fn children(&self) -> &[ChildUse] {
        &self.children
    }
}

/// The top of the schema tree: header/trailer segments (`ISA`/`IEA`)
/// bracketing one or more functional groups, plus the segment dictionary
/// shared by every nested definition for this version.
#[derive(Debug, Clone, PartialEq)]
pub struct InterchangeDef {
    pub version: String,
    pub header: Arc<SegmentDef>,
    pub trailer: Arc<SegmentDef>,
    pub children: Vec<ChildUse>,
    pub dict: Arc<SegmentDict>,
}

impl InterchangeDef {
    pub fn new(
        version: impl Into<String>,
        header: Arc<SegmentDef>,
        trailer: Arc<SegmentDef>,
        children: Vec<ChildUse>,
        dict: Arc<SegmentDict>,
    ) -> Result<Arc<Self>, SchemaError> {
        let version = version.into();
        crate::dense::assert_dense(&version, children.iter().map(|c| c.position))?;
        Ok(Arc::new(Self {
            version,
            header,
            trailer,
            children,
            dict,
        }))
    }
}

impl ChildContainer for InterchangeDef {
    fn children(&self) -> &[ChildUse] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::{RepeatCount, Usage};

    #[test]
    fn loop_trigger_id_follows_first_child() {
        let nm1 = SegmentDef::new("NM1", "Name", "name", vec![]).unwrap();
        let children = vec![ChildUse {
            position: 1,
            child: crate::segment::ChildDef::Segment(nm1),
            usage: Usage::Mandatory,
            repeat_count: RepeatCount::Bounded(1),
        }];
        let loop_def = LoopDef::new("2100", "Individual Name Loop", children).unwrap();
        assert_eq!(loop_def.trigger_id(), Some("NM1"));
    }

    #[test]
    fn child_at_reports_out_of_range() {
        let header = SegmentDef::new("ST", "Transaction Set Header", "st", vec![]).unwrap();
        let trailer = SegmentDef::new("SE", "Transaction Set Trailer", "se", vec![]).unwrap();
        let ts = TransactionSetDef::new("837", "Health Care Claim", header, trailer, vec![]).unwrap();
        let err = ts.child_at(1).unwrap_err();
        assert!(matches!(err, SchemaError::OutOfRange { position: 1, len: 0 }));
    }
}
