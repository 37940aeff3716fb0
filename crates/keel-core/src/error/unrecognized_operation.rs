use super::Error;

/// Error when a row carries an `$operation` outside the supported set.
#[derive(Debug)]
pub(super) struct UnrecognizedOperationError {
    path: Box<str>,
    operation: Box<str>,
}

impl std::error::Error for UnrecognizedOperationError {}

impl core::fmt::Display for UnrecognizedOperationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unrecognized operation `{}` at {}; expected one of create, update, delete, upsert",
            self.operation, self.path
        )
    }
}

impl Error {
    pub fn unrecognized_operation(path: impl ToString, operation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnrecognizedOperation(
            UnrecognizedOperationError {
                path: path.to_string().into(),
                operation: operation.into().into(),
            },
        ))
    }

    pub fn is_unrecognized_operation(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::UnrecognizedOperation(_)))
    }
}
