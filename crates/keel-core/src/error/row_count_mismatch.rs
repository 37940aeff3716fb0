use super::Error;

/// Error when a driver returns a different number of result sets than the
/// number of statements it was handed.
#[derive(Debug)]
pub(super) struct RowCountMismatchError {
    expected: usize,
    actual: usize,
}

impl std::error::Error for RowCountMismatchError {}

impl core::fmt::Display for RowCountMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "row count mismatch: issued {} statements, received {} result sets",
            self.expected, self.actual
        )
    }
}

impl Error {
    pub fn row_count_mismatch(expected: usize, actual: usize) -> Error {
        Error::from(super::ErrorKind::RowCountMismatch(RowCountMismatchError {
            expected,
            actual,
        }))
    }

    pub fn is_row_count_mismatch(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::RowCountMismatch(_)))
    }
}
