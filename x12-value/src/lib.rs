//! Typed element values (component C4): a tagged sum per element kind,
//! `Empty`, `Invalid(raw)`, `NonEmpty(parsed)`, with kind-specific parse,
//! render, and length predicates, and exact fixed-precision arithmetic
//! for the numeric kind.

mod any_value;
mod decimal;
mod kind;
mod numeric_ops;
mod time;
mod value;

pub use any_value::{read_value, AnyValue};
pub use decimal::Decimal;
pub use kind::{AlphaNumeric, Date, ElementKind, Identifier, Numeric, Real, TimeKind};
pub use numeric_ops::NumericValue;
pub use time::Time;
pub use value::ElementValue;

pub type IdentifierValue = ElementValue<Identifier>;
pub type AlphaNumericValue = ElementValue<AlphaNumeric>;
pub type RealValue = ElementValue<Real>;
pub type DateValue = ElementValue<Date>;
pub type TimeValue = ElementValue<TimeKind>;
