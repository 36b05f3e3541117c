/// An error type for the marshalling constructors.
///
/// The numeric operations themselves never fail; degenerate inputs map to
/// documented fallback values. Only building a type from an external scalar
/// slice can be rejected, and only for a length mismatch.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AlgebraError {
    /// The slice does not hold the number of scalars the type requires.
    #[error("expected a slice of {expected} scalars, got {got}")]
    InvalidLength {
        /// Number of scalars the type requires.
        expected: usize,
        /// Number of scalars received.
        got: usize,
    },
}
