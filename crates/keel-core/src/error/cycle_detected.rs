use super::Error;

/// Error when the dependency graph between mutation pieces cannot be
/// linearized.
///
/// This occurs when two or more rows require each other to exist first, for
/// example two creates whose foreign keys reference one another.
#[derive(Debug)]
pub(super) struct CycleDetectedError {
    paths: Box<[Box<str>]>,
}

impl std::error::Error for CycleDetectedError {}

impl core::fmt::Display for CycleDetectedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("cycle detected")?;

        if !self.paths.is_empty() {
            f.write_str(" between mutation pieces: ")?;
            for (i, path) in self.paths.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(path)?;
            }
        }

        Ok(())
    }
}

impl Error {
    /// Creates a cycle error naming the pieces that could not be ordered.
    pub fn cycle_detected<I>(paths: I) -> Error
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Error::from(super::ErrorKind::CycleDetected(CycleDetectedError {
            paths: paths
                .into_iter()
                .map(|path| path.to_string().into_boxed_str())
                .collect(),
        }))
    }

    /// Returns `true` if this error is a cycle error.
    pub fn is_cycle_detected(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::CycleDetected(_)))
    }
}
