use std::marker::PhantomData;
use std::sync::Arc;

use x12_schema::{ElementDef, Usage};
use x12_tokenizer::Position;

use crate::kind::ElementKind;

#[derive(Debug, Clone)]
enum State<T> {
    Empty,
    Invalid(String),
    NonEmpty(T),
}

/// A typed element value: one of `Empty`, `Invalid(raw)`, `NonEmpty(parsed)`
/// per `spec.md` §4.4/§9. Carries the schema definition, usage, and
/// position it was read under, so `too_long?`/`too_short?` and error
/// reporting need no extra arguments.
///
/// Construction is only ever through [`ElementValue::empty`],
/// [`ElementValue::invalid`], and [`ElementValue::value`]; there is no
/// public bare constructor, matching the "factories only" design note.
#[derive(Debug, Clone)]
pub struct ElementValue<K: ElementKind> {
    state: State<K::Parsed>,
    definition: Arc<ElementDef>,
    usage: Usage,
    position: Position,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> ElementValue<K> {
    pub fn empty(definition: Arc<ElementDef>, usage: Usage, position: Position) -> Self {
        Self {
            state: State::Empty,
            definition,
            usage,
            position,
            _kind: PhantomData,
        }
    }

    pub fn invalid(
        raw: impl Into<String>,
        definition: Arc<ElementDef>,
        usage: Usage,
        position: Position,
    ) -> Self {
        Self {
            state: State::Invalid(raw.into()),
            definition,
            usage,
            position,
            _kind: PhantomData,
        }
    }

    pub(crate) fn non_empty(parsed: K::Parsed, definition: Arc<ElementDef>, usage: Usage, position: Position) -> Self {
        Self {
            state: State::NonEmpty(parsed),
            definition,
            usage,
            position,
            _kind: PhantomData,
        }
    }

    /// Reads `raw` under `definition`: blank input is `Empty`; input that
    /// fails `K::parse` is `Invalid(raw)`; otherwise `NonEmpty(parsed)`.
    pub fn value(raw: &str, definition: Arc<ElementDef>, usage: Usage, position: Position) -> Self {
        if raw.is_empty() {
            return Self::empty(definition, usage, position);
        }
        match K::parse(raw, &definition) {
            Some(parsed) => Self::non_empty(parsed, definition, usage, position),
            None => Self::invalid(raw, definition, usage, position),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.state, State::Invalid(_))
    }

    /// `valid?` in spec prose: true only for `NonEmpty`.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::NonEmpty(_))
    }

    pub fn parsed(&self) -> Option<&K::Parsed> {
        match &self.state {
            State::NonEmpty(v) => Some(v),
            _ => None,
        }
    }

    pub fn raw_invalid(&self) -> Option<&str> {
        match &self.state {
            State::Invalid(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn definition(&self) -> &Arc<ElementDef> {
        &self.definition
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Renders the wire form. `Empty` and `Invalid` values render as the
    /// empty string (scenario 4 of `spec.md` §8).
    pub fn to_wire(&self, truncate: bool) -> String {
        match &self.state {
            State::Empty | State::Invalid(_) => String::new(),
            State::NonEmpty(parsed) => K::render(parsed, &self.definition, truncate),
        }
    }

    /// Total: false for `Empty`/`Invalid`, since length predicates are
    /// only meaningful once a value has been parsed.
    pub fn too_long(&self) -> bool {
        match &self.state {
            State::NonEmpty(parsed) => K::too_long(parsed, &self.definition),
            _ => false,
        }
    }

    pub fn too_short(&self) -> bool {
        match &self.state {
            State::NonEmpty(parsed) => K::too_short(parsed, &self.definition),
            _ => false,
        }
    }

    /// Applies `f` to a `NonEmpty` payload; `Empty`/`Invalid` pass through
    /// unchanged, matching the spec's `map` propagation rule.
    pub fn map(&self, f: impl FnOnce(&K::Parsed) -> K::Parsed) -> Self {
        match &self.state {
            State::NonEmpty(parsed) => {
                Self::non_empty(f(parsed), self.definition.clone(), self.usage, self.position.clone())
            }
            _ => self.clone(),
        }
    }
}

impl<K: ElementKind> PartialEq for ElementValue<K> {
    /// `Empty == Empty` iff both are empty and share schema identity
    /// (same definition id); `NonEmpty == NonEmpty` compares parsed values
    /// exactly; `Invalid == Invalid` iff raw characters match; any other
    /// pairing (notably `NonEmpty == Invalid`) is `false`.
    fn eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (State::Empty, State::Empty) => self.definition.id == other.definition.id,
            (State::Invalid(a), State::Invalid(b)) => a == b,
            (State::NonEmpty(a), State::NonEmpty(b)) => a == b,
            _ => false,
        }
    }
}

impl<K: ElementKind> ElementValue<K> {
    /// `NonEmpty == x` coerces `x` through `value(x, usage, position)`
    /// before comparing, matching `spec.md` §4.4's equality rule: a raw
    /// wire fragment that fails to parse under this value's own
    /// definition coerces to `Invalid` and so never equals a `NonEmpty`
    /// (open question (a), resolved `false`).
    pub fn eq_raw(&self, raw: &str) -> bool {
        let coerced = Self::value(raw, self.definition.clone(), self.usage, self.position);
        self == &coerced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Numeric;
    use x12_schema::ElementKind as SchemaElementKind;

    fn def() -> Arc<ElementDef> {
        ElementDef::new("E1", "Test", 1, 10, SchemaElementKind::Numeric { precision: 2 }).unwrap()
    }

    fn pos() -> Position {
        Position::default()
    }

    #[test]
    fn blank_input_is_empty() {
        let v = ElementValue::<Numeric>::value("", def(), Usage::Optional, pos());
        assert!(v.is_empty());
        assert_eq!(v.to_wire(true), "");
    }

    #[test]
    fn bad_numeric_input_is_invalid() {
        let v = ElementValue::<Numeric>::value("12A4", def(), Usage::Optional, pos());
        assert!(v.is_invalid());
        assert!(!v.is_valid());
        assert_eq!(v.to_wire(true), "");
    }

    #[test]
    fn good_numeric_input_is_nonempty() {
        let v = ElementValue::<Numeric>::value("1234", def(), Usage::Optional, pos());
        assert!(v.is_valid());
        assert_eq!(v.to_wire(true), "1234");
    }

    #[test]
    fn nonempty_never_equals_invalid() {
        let a = ElementValue::<Numeric>::value("1234", def(), Usage::Optional, pos());
        let b = ElementValue::<Numeric>::value("12A4", def(), Usage::Optional, pos());
        assert_ne!(a, b);
    }

    #[test]
    fn empty_equals_empty_same_definition() {
        let a = ElementValue::<Numeric>::value("", def(), Usage::Optional, pos());
        let b = ElementValue::<Numeric>::value("", def(), Usage::Optional, pos());
        assert_eq!(a, b);
    }

    #[test]
    fn eq_raw_coerces_through_the_same_definition() {
        let v = ElementValue::<Numeric>::value("1234", def(), Usage::Optional, pos());
        assert!(v.eq_raw("1234"));
        assert!(!v.eq_raw("1235"));
    }

    #[test]
    fn eq_raw_never_matches_an_unparseable_operand() {
        let v = ElementValue::<Numeric>::value("1234", def(), Usage::Optional, pos());
        assert!(!v.eq_raw("12A4"));
    }
}
