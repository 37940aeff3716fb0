use super::Error;

/// Error when the caller-supplied mutation is malformed.
///
/// Examples: a row that is not an object, a `$guid` that is neither an
/// integer nor a string, or a row targeting a table the schema does not know.
#[derive(Debug)]
pub(super) struct InvalidMutationError {
    context: Box<str>,
}

impl std::error::Error for InvalidMutationError {}

impl core::fmt::Display for InvalidMutationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mutation: {}", self.context)
    }
}

impl Error {
    pub fn invalid_mutation(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMutation(InvalidMutationError {
            context: context.into().into(),
        }))
    }

    pub fn is_invalid_mutation(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidMutation(_)))
    }
}
