use std::sync::Arc;

use x12_schema::{ElementDef, Usage};
use x12_tokenizer::Position;

use crate::{AlphaNumericValue, DateValue, IdentifierValue, NumericValue, RealValue, TimeValue};

/// A kind-erased element value, for trees and containers that must hold
/// values of differing kinds uniformly (`x12-tree`'s segment/composite
/// children).
///
/// Each variant wraps the corresponding typed [`crate::ElementValue`];
/// dispatch is a single match rather than dynamic trait objects, since the
/// kind set is closed.
#[derive(Debug, Clone)]
pub enum AnyValue {
    Identifier(IdentifierValue),
    AlphaNumeric(AlphaNumericValue),
    Numeric(NumericValue),
    Real(RealValue),
    Date(DateValue),
    Time(TimeValue),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyValue::Identifier($v) => $body,
            AnyValue::AlphaNumeric($v) => $body,
            AnyValue::Numeric($v) => $body,
            AnyValue::Real($v) => $body,
            AnyValue::Date($v) => $body,
            AnyValue::Time($v) => $body,
        }
    };
}

impl AnyValue {
    pub fn is_empty(&self) -> bool {
        dispatch!(self, v => v.is_empty())
    }

    pub fn is_invalid(&self) -> bool {
        dispatch!(self, v => v.is_invalid())
    }

    pub fn is_valid(&self) -> bool {
        dispatch!(self, v => v.is_valid())
    }

    pub fn to_wire(&self, truncate: bool) -> String {
        dispatch!(self, v => v.to_wire(truncate))
    }

    pub fn too_long(&self) -> bool {
        dispatch!(self, v => v.too_long())
    }

    pub fn too_short(&self) -> bool {
        dispatch!(self, v => v.too_short())
    }

    pub fn definition(&self) -> &Arc<ElementDef> {
        dispatch!(self, v => v.definition())
    }

    pub fn usage(&self) -> Usage {
        dispatch!(self, v => v.usage())
    }

    pub fn position(&self) -> &Position {
        dispatch!(self, v => v.position())
    }

    pub fn raw_invalid(&self) -> Option<&str> {
        dispatch!(self, v => v.raw_invalid())
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnyValue::Identifier(a), AnyValue::Identifier(b)) => a == b,
            (AnyValue::AlphaNumeric(a), AnyValue::AlphaNumeric(b)) => a == b,
            (AnyValue::Numeric(a), AnyValue::Numeric(b)) => a == b,
            (AnyValue::Real(a), AnyValue::Real(b)) => a == b,
            (AnyValue::Date(a), AnyValue::Date(b)) => a == b,
            (AnyValue::Time(a), AnyValue::Time(b)) => a == b,
            _ => false,
        }
    }
}

/// Reads `raw` under `definition`'s declared kind, producing the matching
/// [`AnyValue`] variant. The bridge between the schema's kind tag and the
/// typed `ElementValue` constructors.
pub fn read_value(raw: &str, definition: Arc<ElementDef>, usage: Usage, position: Position) -> AnyValue {
    use x12_schema::ElementKind as SchemaKind;
    match &definition.kind {
        SchemaKind::Identifier => AnyValue::Identifier(IdentifierValue::value(raw, definition, usage, position)),
        SchemaKind::AlphaNumeric => {
            AnyValue::AlphaNumeric(AlphaNumericValue::value(raw, definition, usage, position))
        }
        SchemaKind::Numeric { .. } => AnyValue::Numeric(NumericValue::value(raw, definition, usage, position)),
        SchemaKind::Real => AnyValue::Real(RealValue::value(raw, definition, usage, position)),
        SchemaKind::Date => AnyValue::Date(DateValue::value(raw, definition, usage, position)),
        SchemaKind::Time => AnyValue::Time(TimeValue::value(raw, definition, usage, position)),
    }
}
