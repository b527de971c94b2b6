use std::sync::Arc;

use crate::error::SchemaError;

/// Per-kind behavior of an element definition.
///
/// Mirrors `spec.md` §3/§4.4: the numeric kind is implied-decimal (the
/// decimal point never appears on the wire, its position is fixed by
/// `precision`); `Real` is the explicit-decimal-point counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Enumerated code, optionally validated against a code list.
    Identifier,
    /// Free-form alphanumeric string.
    AlphaNumeric,
    /// Fixed-precision numeric with an implicit decimal point.
    Numeric { precision: u8 },
    /// Numeric with an explicit decimal point on the wire.
    Real,
    /// `CCYYMMDD` or `YYMMDD`.
    Date,
    /// `HHMM[SS[dd]]`.
    Time,
}

impl ElementKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ElementKind::Numeric { .. } | ElementKind::Real)
    }
}

/// Identity, length bounds, and kind of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    /// Identity, e.g. `"E67"`.
    pub id: String,
    pub name: String,
    pub min_length: u16,
    pub max_length: u16,
    pub kind: ElementKind,
    /// Valid code values, meaningful only for [`ElementKind::Identifier`].
    pub code_list: Option<Vec<String>>,
}

impl ElementDef {
    /// Builds and validates a definition.
    ///
    /// Fails with [`SchemaError::PrecisionExceedsMaxLength`] if `kind` is
    /// `Numeric { precision }` with `precision > max_length`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        min_length: u16,
        max_length: u16,
        kind: ElementKind,
    ) -> Result<Arc<Self>, SchemaError> {
        let id = id.into();
        if let ElementKind::Numeric { precision } = kind {
            if precision as u16 > max_length {
                return Err(SchemaError::PrecisionExceedsMaxLength {
                    id,
                    precision,
                    max_length,
                });
            }
        }
        Ok(Arc::new(Self {
            id,
            name: name.into(),
            min_length,
            max_length,
            kind,
            code_list: None,
        }))
    }

    /// Attaches a code list, for [`ElementKind::Identifier`] elements.
    pub fn with_code_list(mut self, codes: Vec<String>) -> Self {
        self.code_list = Some(codes);
        self
    }
}

/// An ordered list of component element definitions plus per-component
/// usage, bound at composite-definition positions.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeDef {
    pub id: String,
    pub name: String,
    pub components: Vec<ComponentUse>,
}

/// A component element definition bound at a 1-indexed, dense position
/// within a composite.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentUse {
    pub position: u16,
    pub definition: Arc<ElementDef>,
    pub usage: crate::usage::Usage,
}

impl CompositeDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        components: Vec<ComponentUse>,
    ) -> Result<Arc<Self>, SchemaError> {
        let id = id.into();
        crate::dense::assert_dense(&id, components.iter().map(|c| c.position))?;
        Ok(Arc::new(Self {
            id,
            name: name.into(),
            components,
        }))
    }

    pub fn component_at(&self, position: u16) -> Result<&ComponentUse, SchemaError> {
        position
            .checked_sub(1)
            .and_then(|i| self.components.get(i as usize))
            .ok_or(SchemaError::OutOfRange {
                position,
                len: self.components.len(),
            })
    }
}
