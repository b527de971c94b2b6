//! Arithmetic over `NonEmpty` numeric element values (`spec.md` §4.4).
//!
//! `Empty`/`Invalid` operands make any arithmetic result `Invalid`, since
//! there is no raw string to carry, so the empty string stands in as the
//! "no meaningful operand" marker. Every operator is defined only for
//! [`NumericValue`] (the `Numeric` kind); other kinds have no arithmetic,
//! per spec.
//!
//! Mixed operations against a bare number or [`Decimal`] go through
//! [`IntoDecimal`], the explicit conversion spec.md §9 calls for in place
//! of a `coerce` mixin hook: any operand that can't be lifted would
//! produce `Invalid` rather than panicking, though every `IntoDecimal`
//! impl here is total (plain integers and `Decimal` always lift). The
//! wire-fragment case that can actually fail to lift, `NonEmpty == x`
//! where `x` is raw element text, is `ElementValue::eq_raw` in
//! `value.rs`, which applies to every kind, not only `Numeric`.

use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use x12_schema::ElementKind as SchemaElementKind;

use crate::decimal::Decimal;
use crate::kind::Numeric;
use crate::value::ElementValue;

pub type NumericValue = ElementValue<Numeric>;

/// Lifts a plain number or an already-built [`Decimal`] into the decimal
/// domain that [`NumericValue`] arithmetic and comparisons operate in.
pub trait IntoDecimal {
    fn into_decimal(&self) -> Decimal;
}

impl IntoDecimal for Decimal {
    fn into_decimal(&self) -> Decimal {
        *self
    }
}

macro_rules! impl_into_decimal_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoDecimal for $t {
                fn into_decimal(&self) -> Decimal {
                    Decimal::new(*self as i128, 0)
                }
            }
        )*
    };
}

impl_into_decimal_int!(i8, i16, i32, i64, i128);

impl NumericValue {
    /// Lifts this value into a bare [`Decimal`], the explicit conversion
    /// invoked before arithmetic (replacing a `coerce` mixin hook per the
    /// design notes).
    pub fn into_decimal(&self) -> Option<Decimal> {
        self.parsed().copied()
    }

    fn invalid_like(&self) -> Self {
        Self::invalid(String::new(), self.definition().clone(), self.usage(), *self.position())
    }

    /// Wraps `result` back into a value carrying this value's definition,
    /// usage, and position (arithmetic results inherit from the left
    /// operand), rescaled to the definition's declared precision.
    fn from_decimal(&self, result: Decimal) -> Self {
        let precision = match &self.definition().kind {
            SchemaElementKind::Numeric { precision } => *precision,
            _ => result.precision(),
        };
        let rescaled = result.rescale(precision).unwrap_or(result);
        Self::non_empty(rescaled, self.definition().clone(), self.usage(), *self.position())
    }

    fn binary_with(&self, other: Decimal, op: impl FnOnce(Decimal, Decimal) -> Option<Decimal>) -> Self {
        match self.into_decimal() {
            Some(a) => match op(a, other) {
                Some(result) => self.from_decimal(result),
                None => self.invalid_like(),
            },
            None => self.invalid_like(),
        }
    }

    fn binary(&self, other: &Self, op: impl FnOnce(Decimal, Decimal) -> Option<Decimal>) -> Self {
        match other.into_decimal() {
            Some(b) => self.binary_with(b, op),
            None => self.invalid_like(),
        }
    }

    pub fn abs(&self) -> Self {
        match self.into_decimal() {
            Some(d) => self.from_decimal(d.abs()),
            None => self.invalid_like(),
        }
    }
}

impl Add for &NumericValue {
    type Output = NumericValue;
    fn add(self, rhs: Self) -> NumericValue {
        self.binary(rhs, Decimal::checked_add)
    }
}

impl Sub for &NumericValue {
    type Output = NumericValue;
    fn sub(self, rhs: Self) -> NumericValue {
        self.binary(rhs, Decimal::checked_sub)
    }
}

impl Mul for &NumericValue {
    type Output = NumericValue;
    fn mul(self, rhs: Self) -> NumericValue {
        self.binary(rhs, Decimal::checked_mul)
    }
}

impl Div for &NumericValue {
    type Output = NumericValue;
    fn div(self, rhs: Self) -> NumericValue {
        self.binary(rhs, Decimal::checked_div)
    }
}

impl Rem for &NumericValue {
    type Output = NumericValue;
    fn rem(self, rhs: Self) -> NumericValue {
        self.binary(rhs, Decimal::checked_rem)
    }
}

impl Neg for &NumericValue {
    type Output = NumericValue;
    fn neg(self) -> NumericValue {
        match self.into_decimal() {
            Some(d) => self.from_decimal(d.neg()),
            None => self.invalid_like(),
        }
    }
}

/// Mixed arithmetic against a plain number or `Decimal`: `a + 5`, `a *
/// Decimal::new(...)`. The result inherits `a`'s definition/usage/position,
/// same as `NumericValue + NumericValue`.
macro_rules! impl_coerced_ops {
    ($($Op:ident :: $method:ident => $decimal_fn:path),* $(,)?) => {
        $(
            impl<T: IntoDecimal> $Op<T> for &NumericValue {
                type Output = NumericValue;
                fn $method(self, rhs: T) -> NumericValue {
                    self.binary_with(rhs.into_decimal(), $decimal_fn)
                }
            }
        )*
    };
}

impl_coerced_ops! {
    Add::add => Decimal::checked_add,
    Sub::sub => Decimal::checked_sub,
    Mul::mul => Decimal::checked_mul,
    Div::div => Decimal::checked_div,
    Rem::rem => Decimal::checked_rem,
}

impl PartialOrd for NumericValue {
    /// Total ordering over `NonEmpty` values; `Empty`/`Invalid` operands
    /// are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.into_decimal()?.partial_cmp(&other.into_decimal()?)
    }
}

impl<T: IntoDecimal> PartialEq<T> for NumericValue {
    /// `NonEmpty == n` for a plain number or `Decimal` compares exactly
    /// through the shared `Decimal` representation; `Empty`/`Invalid`
    /// never equal one (spec.md §4.4's "plain numbers" comparison case).
    fn eq(&self, other: &T) -> bool {
        matches!(self.into_decimal(), Some(a) if a == other.into_decimal())
    }
}

impl<T: IntoDecimal> PartialOrd<T> for NumericValue {
    fn partial_cmp(&self, other: &T) -> Option<std::cmp::Ordering> {
        self.into_decimal()?.partial_cmp(&other.into_decimal())
    }
}
