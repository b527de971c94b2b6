//! The constructed value tree (component C5): a uniform node shape
//! spanning every nesting level, from the interchange envelope down to
//! individual element values.

mod change;
mod envelope;
mod node;

pub use change::FieldChange;
pub use envelope::replace_separators;
pub use node::{Leaf, Node, NodeKind};
