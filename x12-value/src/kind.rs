use chrono::NaiveDate;
use x12_schema::{ElementDef, ElementKind as SchemaElementKind};

use crate::decimal::Decimal;
use crate::time::Time;

/// Per-kind parsing, rendering, and length-predicate behavior.
///
/// A capability interface rather than a base class: `ElementValue<K>`
/// holds no logic of its own beyond dispatch, matching the tagged-sum
/// design (no inheritance, no shared mutable `new`).
pub trait ElementKind {
    type Parsed: Clone + PartialEq + std::fmt::Debug;

    fn parse(raw: &str, def: &ElementDef) -> Option<Self::Parsed>;
    fn render(parsed: &Self::Parsed, def: &ElementDef, truncate: bool) -> String;
    fn too_long(parsed: &Self::Parsed, def: &ElementDef) -> bool;
    fn too_short(parsed: &Self::Parsed, def: &ElementDef) -> bool;
}

fn char_len(s: &str) -> u16 {
    s.chars().count().min(u16::MAX as usize) as u16
}

/// Enumerated code, optionally validated against `def.code_list`.
#[derive(Debug, Clone, Copy)]
pub struct Identifier;

impl ElementKind for Identifier {
    type Parsed = String;

    fn parse(raw: &str, def: &ElementDef) -> Option<String> {
        if let Some(codes) = &def.code_list {
            if !codes.iter().any(|c| c == raw) {
                return None;
            }
        }
        Some(raw.to_string())
    }

    fn render(parsed: &String, _def: &ElementDef, _truncate: bool) -> String {
        parsed.clone()
    }

    fn too_long(parsed: &String, def: &ElementDef) -> bool {
        char_len(parsed) > def.max_length
    }

    fn too_short(parsed: &String, def: &ElementDef) -> bool {
        char_len(parsed) < def.min_length
    }
}

/// Free-form text.
#[derive(Debug, Clone, Copy)]
pub struct AlphaNumeric;

impl ElementKind for AlphaNumeric {
    type Parsed = String;

    fn parse(raw: &str, _def: &ElementDef) -> Option<String> {
        Some(raw.to_string())
    }

    fn render(parsed: &String, def: &ElementDef, truncate: bool) -> String {
        if truncate && char_len(parsed) > def.max_length {
            parsed.chars().take(def.max_length as usize).collect()
        } else {
            parsed.clone()
        }
    }

    fn too_long(parsed: &String, def: &ElementDef) -> bool {
        char_len(parsed) > def.max_length
    }

    fn too_short(parsed: &String, def: &ElementDef) -> bool {
        char_len(parsed) < def.min_length
    }
}

/// Fixed-precision implied-decimal numeric ("Nn"); the representative
/// hard case (`spec.md` §4.4).
#[derive(Debug, Clone, Copy)]
pub struct Numeric;

impl ElementKind for Numeric {
    type Parsed = Decimal;

    fn parse(raw: &str, def: &ElementDef) -> Option<Decimal> {
        let precision = match &def.kind {
            SchemaElementKind::Numeric { precision } => *precision,
            _ => 0,
        };
        Decimal::parse_implied(raw, precision)
    }

    fn render(parsed: &Decimal, def: &ElementDef, truncate: bool) -> String {
        let digits = parsed.render_digits(def.min_length, def.max_length, truncate);
        if parsed.is_negative() {
            format!("-{digits}")
        } else {
            digits
        }
    }

    /// `ceil(log10(abs(m)+1)) > max_length`, sign excluded.
    fn too_long(parsed: &Decimal, def: &ElementDef) -> bool {
        parsed.digit_count() > def.max_length as u32
    }

    /// Numeric values are always renderable to at least `min_length` via
    /// zero-padding, so this predicate is never true.
    fn too_short(_parsed: &Decimal, _def: &ElementDef) -> bool {
        false
    }
}

/// Explicit decimal-point numeric ("R"); precision comes from the wire
/// text rather than the schema.
#[derive(Debug, Clone, Copy)]
pub struct Real;

impl ElementKind for Real {
    type Parsed = Decimal;

    fn parse(raw: &str, _def: &ElementDef) -> Option<Decimal> {
        Decimal::parse_explicit(raw)
    }

    fn render(parsed: &Decimal, _def: &ElementDef, _truncate: bool) -> String {
        parsed.to_string()
    }

    fn too_long(parsed: &Decimal, def: &ElementDef) -> bool {
        char_len(&parsed.to_string()) > def.max_length
    }

    fn too_short(parsed: &Decimal, def: &ElementDef) -> bool {
        char_len(&parsed.to_string()) < def.min_length
    }
}

/// `CCYYMMDD` (8 digits) or `YYMMDD` (6 digits, century inferred by
/// `chrono`'s default two-digit-year pivot).
#[derive(Debug, Clone, Copy)]
pub struct Date;

impl ElementKind for Date {
    type Parsed = NaiveDate;

    fn parse(raw: &str, _def: &ElementDef) -> Option<NaiveDate> {
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match raw.len() {
            8 => NaiveDate::parse_from_str(raw, "%Y%m%d").ok(),
            6 => NaiveDate::parse_from_str(raw, "%y%m%d").ok(),
            _ => None,
        }
    }

    fn render(parsed: &NaiveDate, def: &ElementDef, _truncate: bool) -> String {
        if def.max_length <= 6 {
            parsed.format("%y%m%d").to_string()
        } else {
            parsed.format("%Y%m%d").to_string()
        }
    }

    fn too_long(_parsed: &NaiveDate, _def: &ElementDef) -> bool {
        false
    }

    fn too_short(_parsed: &NaiveDate, _def: &ElementDef) -> bool {
        false
    }
}

/// `HHMM[SS[dd]]`.
#[derive(Debug, Clone, Copy)]
pub struct TimeKind;

impl ElementKind for TimeKind {
    type Parsed = Time;

    fn parse(raw: &str, _def: &ElementDef) -> Option<Time> {
        Time::parse(raw)
    }

    fn render(parsed: &Time, _def: &ElementDef, _truncate: bool) -> String {
        parsed.to_string()
    }

    fn too_long(_parsed: &Time, _def: &ElementDef) -> bool {
        false
    }

    fn too_short(_parsed: &Time, _def: &ElementDef) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use x12_schema::ElementDef as Def;

    fn numeric_def(precision: u8, min: u16, max: u16) -> Arc<Def> {
        Def::new("E1", "Test Numeric", min, max, SchemaElementKind::Numeric { precision }).unwrap()
    }

    #[test]
    fn numeric_parse_and_render_roundtrip() {
        let def = numeric_def(2, 1, 10);
        let parsed = Numeric::parse("1234", &def).unwrap();
        assert_eq!(parsed.to_string(), "12.34");
        assert_eq!(Numeric::render(&parsed, &def, true), "1234");
    }

    #[test]
    fn numeric_pads_to_min_length() {
        let def = numeric_def(0, 4, 10);
        let parsed = Numeric::parse("7", &def).unwrap();
        assert_eq!(Numeric::render(&parsed, &def, true), "0007");
    }

    #[test]
    fn identifier_rejects_code_outside_list() {
        let def = Def::new("E2", "Qualifier", 1, 2, SchemaElementKind::Identifier)
            .unwrap()
            .as_ref()
            .clone()
            .with_code_list(vec!["BY".into(), "SE".into()]);
        assert!(Identifier::parse("BY", &def).is_some());
        assert!(Identifier::parse("ZZ", &def).is_none());
    }

    #[test]
    fn date_parses_both_widths() {
        let def = Def::new("E3", "Date", 6, 8, SchemaElementKind::Date).unwrap();
        assert!(Date::parse("20240115", &def).is_some());
        assert!(Date::parse("240115", &def).is_some());
    }
}
