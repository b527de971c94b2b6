use crate::error::SchemaError;

/// Checks that `positions` (in declaration order) form the dense 1..=n
/// sequence required of child/element lists: no gaps, no duplicates,
/// starting at 1. `NotUsed` children still occupy a position, so this is
/// purely a structural check independent of [`crate::usage::Usage`].
pub fn assert_dense(
    parent: &str,
    positions: impl Iterator<Item = u16>,
) -> Result<(), SchemaError> {
    let mut seen: Vec<u16> = positions.collect();
    seen.sort_unstable();
    for (expected, actual) in (1..=seen.len() as u16).zip(seen.iter().copied()) {
        if expected != actual {
            return Err(SchemaError::NonDensePositions {
                parent: parent.to_string(),
                detail: format!("expected position {expected}, found {actual}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_sequence_passes() {
        assert!(assert_dense("TEST", [1, 2, 3].into_iter()).is_ok());
    }

    #[test]
    fn gap_fails() {
        let err = assert_dense("TEST", [1, 3].into_iter()).unwrap_err();
        assert!(matches!(err, SchemaError::NonDensePositions { .. }));
    }

    #[test]
    fn duplicate_fails() {
        let err = assert_dense("TEST", [1, 1, 2].into_iter()).unwrap_err();
        assert!(matches!(err, SchemaError::NonDensePositions { .. }));
    }
}
