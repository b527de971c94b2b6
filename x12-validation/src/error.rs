use std::fmt;

use x12_tokenizer::Position;

/// Which kind of structural cross-check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A trailer's control number does not match its opening segment's.
    ControlNumberMismatch,
    /// A transaction set's declared segment count does not match the
    /// number of segments actually present between its `ST` and `SE`.
    SegmentCountMismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControlNumberMismatch => write!(f, "control number mismatch"),
            Self::SegmentCountMismatch => write!(f, "segment count mismatch"),
        }
    }
}

/// One structural cross-check failure, with enough context to report it
/// without re-walking the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    /// The envelope/container this check ran against, e.g. `"IEA"`.
    pub segment_id: String,
    pub message: String,
    pub position: Position,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}: {}", self.position, self.kind, self.segment_id, self.message)
    }
}
