use super::Error;

/// Error when an update, delete or upsert piece has no usable primary key or
/// unique field group to locate its row with.
#[derive(Debug)]
pub(super) struct MissingIdentifyingKeyError {
    path: Box<str>,
    candidates: Vec<Vec<String>>,
}

impl std::error::Error for MissingIdentifyingKeyError {}

impl core::fmt::Display for MissingIdentifyingKeyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "missing identifying key for {}", self.path)?;

        if !self.candidates.is_empty() {
            f.write_str("; rejected candidates: ")?;
            for (i, candidate) in self.candidates.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "({})", candidate.join(", "))?;
            }
        }

        Ok(())
    }
}

impl Error {
    /// Creates a missing identifying key error.
    ///
    /// `path` locates the piece in the original mutation and `candidates`
    /// lists every key group that was considered and rejected.
    pub fn missing_identifying_key(path: impl ToString, candidates: Vec<Vec<String>>) -> Error {
        Error::from(super::ErrorKind::MissingIdentifyingKey(
            MissingIdentifyingKeyError {
                path: path.to_string().into(),
                candidates,
            },
        ))
    }

    pub fn is_missing_identifying_key(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::MissingIdentifyingKey(_)))
    }
}
