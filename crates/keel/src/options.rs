use serde::{Deserialize, Serialize};

/// Planner options.
///
/// Deserializable so callers can embed it in their own configuration files;
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// When several unique field groups could identify a row, pick the
    /// shortest instead of refusing to choose.
    pub allow_ambiguous_identifying_key: bool,

    /// Synthesize foreign-key placeholders between nested pieces. Primary-key
    /// placeholders are assigned regardless.
    pub infer_guids: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            allow_ambiguous_identifying_key: false,
            infer_guids: true,
        }
    }
}
