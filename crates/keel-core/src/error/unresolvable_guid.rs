use super::Error;

/// Error when an identifying field holds a read guid whose write piece cannot
/// itself be located, so the lookup cannot be expressed.
#[derive(Debug)]
pub(super) struct UnresolvableGuidError {
    guid: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnresolvableGuidError {}

impl core::fmt::Display for UnresolvableGuidError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unresolvable guid {} in field {}: its write piece has no identifying fields",
            self.guid, self.field
        )
    }
}

impl Error {
    pub fn unresolvable_guid(guid: impl ToString, field: impl ToString) -> Error {
        Error::from(super::ErrorKind::UnresolvableGuid(UnresolvableGuidError {
            guid: guid.to_string().into(),
            field: field.to_string().into(),
        }))
    }

    pub fn is_unresolvable_guid(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::UnresolvableGuid(_)))
    }
}
