/// Schema-level errors.
///
/// The load-time variants ([`PrecisionExceedsMaxLength`][Self::PrecisionExceedsMaxLength],
/// [`NonDensePositions`][Self::NonDensePositions], [`DuplicateDefinition`][Self::DuplicateDefinition])
/// are `spec.md`'s `InvalidSchemaError`: raised when a definition is built, never at parse time, and
/// always fatal to that definition's construction. [`OutOfRange`][Self::OutOfRange] is a run-time
/// lookup error returned by `child_at`/`element_at` against an already-valid schema.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("numeric element {id} declares precision {precision} exceeding max_length {max_length}")]
    PrecisionExceedsMaxLength {
        id: String,
        precision: u8,
        max_length: u16,
    },

    #[error("{parent} declares non-dense child positions: {detail}")]
    NonDensePositions {
        parent: String,
        detail: String,
    },

    #[error("duplicate definition id {id} within {parent}")]
    DuplicateDefinition {
        parent: String,
        id: String,
    },

    #[error("position {position} out of range ({len} children declared)")]
    OutOfRange { position: u16, len: usize },

    #[error("{kind} definition not found for id {id}")]
    NotFound {
        kind: &'static str,
        id: String,
    },
}
