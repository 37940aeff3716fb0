use super::Error;

/// Error when a schema fails verification while it is being built.
#[derive(Debug)]
pub(super) struct InvalidSchemaError {
    context: Box<str>,
}

impl std::error::Error for InvalidSchemaError {}

impl core::fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.context)
    }
}

impl Error {
    pub fn invalid_schema(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchemaError {
            context: context.into().into(),
        }))
    }

    pub fn is_invalid_schema(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
