/// Fatal tokenizer error: the ISA header could not yield [`crate::Separators`].
///
/// There is no recovery: without separators there are no further tokens.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("malformed ISA header: {reason}")]
    MalformedHeader { reason: &'static str },
}
