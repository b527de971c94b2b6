use std::cmp::Ordering;
use std::fmt;

/// A fixed-precision decimal: `mantissa * 10^-precision`, stored as an
/// `i128` integer mantissa plus a `u8` scale. Exact, no binary float
/// drift, satisfying the arithmetic-closure property over `Numeric`
/// element values.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    precision: u8,
}

impl Decimal {
    pub fn new(mantissa: i128, precision: u8) -> Self {
        Self { mantissa, precision }
    }

    pub fn zero(precision: u8) -> Self {
        Self::new(0, precision)
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Parses an implied-decimal wire string: an optional leading `-`,
    /// then digits only. The decimal point is never present; its position
    /// is fixed by `precision`.
    pub fn parse_implied(raw: &str, precision: u8) -> Option<Decimal> {
        let (negative, digits) = split_sign(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mantissa: i128 = digits.parse().ok()?;
        Some(Decimal::new(if negative { -mantissa } else { mantissa }, precision))
    }

    /// Parses an explicit-decimal-point wire string (`Real` kind): an
    /// optional leading `-`, digits, an optional `.`, more digits. The
    /// precision is derived from the number of digits after the point.
    pub fn parse_explicit(raw: &str) -> Option<Decimal> {
        let (negative, body) = split_sign(raw);
        if body.is_empty() {
            return None;
        }
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        let precision = frac_part.len() as u8;
        let digits: String = format!("{int_part}{frac_part}");
        let digits = if digits.is_empty() { "0" } else { &digits };
        let mantissa: i128 = digits.parse().ok()?;
        Some(Decimal::new(if negative { -mantissa } else { mantissa }, precision))
    }

    /// Rescales to a higher (or equal) precision, multiplying the mantissa
    /// by the appropriate power of ten. Returns `None` if `precision` is
    /// lower than `self.precision` (narrowing would lose digits).
    pub fn rescale(&self, precision: u8) -> Option<Decimal> {
        if precision < self.precision {
            return None;
        }
        let factor = 10i128.checked_pow((precision - self.precision) as u32)?;
        let mantissa = self.mantissa.checked_mul(factor)?;
        Some(Decimal::new(mantissa, precision))
    }

    fn common_scale(a: Decimal, b: Decimal) -> Option<(Decimal, Decimal)> {
        let precision = a.precision.max(b.precision);
        Some((a.rescale(precision)?, b.rescale(precision)?))
    }

    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        let (a, b) = Self::common_scale(self, other)?;
        Some(Decimal::new(a.mantissa.checked_add(b.mantissa)?, a.precision))
    }

    pub fn checked_sub(self, other: Decimal) -> Option<Decimal> {
        let (a, b) = Self::common_scale(self, other)?;
        Some(Decimal::new(a.mantissa.checked_sub(b.mantissa)?, a.precision))
    }

    /// Exact: precision sums, matching `10^-p1 * 10^-p2 = 10^-(p1+p2)`.
    pub fn checked_mul(self, other: Decimal) -> Option<Decimal> {
        let mantissa = self.mantissa.checked_mul(other.mantissa)?;
        let precision = self.precision.checked_add(other.precision)?;
        Some(Decimal::new(mantissa, precision))
    }

    /// Divides, rounding half-away-from-zero to `self.precision` (the
    /// dividend's scale), the convention a numeric element continues to
    /// render under. Returns `None` on division by zero.
    pub fn checked_div(self, other: Decimal) -> Option<Decimal> {
        if other.mantissa == 0 {
            return None;
        }
        let target_precision = self.precision.max(other.precision);
        let scale_up = 10i128.checked_pow(target_precision as u32 + 1)?;
        let numerator = self.mantissa.checked_mul(scale_up)?;
        let denominator = other.rescale(target_precision).map(|d| d.mantissa)?;
        if denominator == 0 {
            return None;
        }
        let scaled = numerator / denominator;
        Some(round_last_digit(scaled, target_precision))
    }

    pub fn checked_rem(self, other: Decimal) -> Option<Decimal> {
        let (a, b) = Self::common_scale(self, other)?;
        if b.mantissa == 0 {
            return None;
        }
        Some(Decimal::new(a.mantissa.checked_rem(b.mantissa)?, a.precision))
    }

    pub fn neg(self) -> Decimal {
        Decimal::new(-self.mantissa, self.precision)
    }

    pub fn abs(self) -> Decimal {
        Decimal::new(self.mantissa.abs(), self.precision)
    }

    /// Count of decimal digits in `abs(mantissa)`, i.e. `digit_count` from
    /// `too_long?`'s definition. Zero has a digit count of 1.
    pub fn digit_count(&self) -> u32 {
        let magnitude = self.mantissa.unsigned_abs();
        if magnitude == 0 {
            1
        } else {
            magnitude.ilog10() + 1
        }
    }

    /// Renders `abs(mantissa)` as plain decimal digits, left-padded with
    /// `0` to `min_width` and, if `truncate`, capped to the leftmost
    /// `max_width` digits.
    pub fn render_digits(&self, min_width: u16, max_width: u16, truncate: bool) -> String {
        let mut digits = self.mantissa.unsigned_abs().to_string();
        if truncate && digits.len() > max_width as usize {
            digits.truncate(max_width as usize);
        }
        while digits.len() < min_width as usize {
            digits.insert(0, '0');
        }
        digits
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }
}

/// Rounds `scaled` (one digit wider than `precision`) half-away-from-zero
/// down to `precision`.
fn round_last_digit(scaled: i128, precision: u8) -> Decimal {
    let last_digit = scaled % 10;
    let mut truncated = scaled / 10;
    if last_digit.abs() >= 5 {
        truncated += last_digit.signum();
    }
    Decimal::new(truncated, precision)
}

fn split_sign(raw: &str) -> (bool, &str) {
    match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        match Self::common_scale(*self, *other) {
            Some((a, b)) => a.mantissa == b.mantissa,
            None => false,
        }
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match Self::common_scale(*self, *other) {
            Some((a, b)) => a.mantissa.cmp(&b.mantissa),
            None => {
                // Narrowing only fails when rescaling down; compare at the
                // wider of the two precisions by rescaling the other way.
                let precision = self.precision.max(other.precision);
                let a = self.rescale(precision).unwrap_or(*self);
                let b = other.rescale(precision).unwrap_or(*other);
                a.mantissa.cmp(&b.mantissa)
            }
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precision == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.render_digits(self.precision as u16 + 1, u16::MAX, false);
        let split = digits.len() - self.precision as usize;
        write!(f, "{sign}{}.{}", &digits[..split], &digits[split..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_implied_decimal() {
        let d = Decimal::parse_implied("1234", 2).unwrap();
        assert_eq!(d.to_string(), "12.34");
    }

    #[test]
    fn parses_negative_implied_decimal() {
        let d = Decimal::parse_implied("-050", 1).unwrap();
        assert_eq!(d.to_string(), "-5.0");
    }

    #[test]
    fn rejects_non_digit_implied() {
        assert!(Decimal::parse_implied("12A4", 2).is_none());
    }

    #[test]
    fn parses_explicit_decimal() {
        let d = Decimal::parse_explicit("12.340").unwrap();
        assert_eq!(d.precision(), 3);
        assert_eq!(d.to_string(), "12.340");
    }

    #[test]
    fn add_rescales_to_common_precision() {
        let a = Decimal::new(100, 2); // 1.00
        let b = Decimal::new(5, 0); // 5
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.to_string(), "6.00");
    }

    #[test]
    fn mul_sums_precision_exactly() {
        let a = Decimal::new(150, 2); // 1.50
        let b = Decimal::new(200, 2); // 2.00
        let product = a.checked_mul(b).unwrap();
        assert_eq!(product.precision(), 4);
        assert_eq!(product.to_string(), "3.0000");
    }

    #[test]
    fn div_by_zero_is_none() {
        let a = Decimal::new(100, 2);
        assert!(a.checked_div(Decimal::new(0, 2)).is_none());
    }

    #[test]
    fn equality_ignores_precision_padding() {
        assert_eq!(Decimal::new(100, 2), Decimal::new(10, 1));
    }

    #[test]
    fn digit_count_matches_length() {
        assert_eq!(Decimal::new(1234, 2).digit_count(), 4);
        assert_eq!(Decimal::new(0, 0).digit_count(), 1);
    }

    #[test]
    fn render_digits_pads_and_truncates() {
        let d = Decimal::new(7, 2);
        assert_eq!(d.render_digits(4, 10, true), "0007");
        let big = Decimal::new(123456, 0);
        assert_eq!(big.render_digits(1, 3, true), "123");
    }
}
