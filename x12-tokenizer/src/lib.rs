#![cfg_attr(not(feature = "std"), no_std)]

//! X12 delimiter inference and tokenization (components C1/C2).
//!
//! Recovers the five-delimiter [`Separators`] from an interchange's ISA
//! header and splits the remaining byte stream into [`SegmentTok`]s without
//! interpreting element content, which is the job of the schema-driven
//! layers built on top (`x12-schema`, `x12-value`, `x12-parser`).
//!
//! Zero-copy: every token borrows from the input buffer. Streaming: the
//! [`Tokenizer`] iterator is single-consumer and non-restartable, matching
//! the shape of a byte source that is read once.

extern crate alloc;

mod error;
mod position;
mod separators;
mod token;
mod tokenizer;

pub use error::TokenizeError;
pub use position::Position;
pub use separators::{Separators, ISA_LENGTH};
pub use token::{ElementShape, ElementTok, SegmentTok};
pub use tokenizer::{tokenize_all, Tokenizer};
