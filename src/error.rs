use num::BigInt;
use thiserror::Error;

/// A checked access asked for an index outside `[0, bound)`.
///
/// The index is kept as a `BigInt` so that any primitive integer, including
/// negative values and `u128::MAX`, is reported exactly as requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("index {index} is out of range for length {bound}")]
pub struct OutOfRangeError {
    index: BigInt,
    bound: usize,
}

impl OutOfRangeError {
    pub fn new(index: impl Into<BigInt>, bound: usize) -> Self {
        Self {
            index: index.into(),
            bound,
        }
    }

    pub fn index(&self) -> &BigInt {
        &self.index
    }

    pub fn bound(&self) -> usize {
        self.bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_index_and_bound() {
        let err = OutOfRangeError::new(3, 1);
        assert_eq!(err.to_string(), "index 3 is out of range for length 1");
    }

    #[test]
    fn test_negative_index_is_kept() {
        let err = OutOfRangeError::new(-7i64, 4);
        assert_eq!(err.index(), &BigInt::from(-7));
        assert_eq!(err.bound(), 4);
        assert_eq!(err.to_string(), "index -7 is out of range for length 4");
    }

    #[test]
    fn test_wide_unsigned_index_is_exact() {
        let err = OutOfRangeError::new(u128::MAX, 2);
        assert_eq!(err.index(), &BigInt::from(u128::MAX));
    }
}
