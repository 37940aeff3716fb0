use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies a placeholder value shared between fields of a mutation.
///
/// Callers supply integer or string ids in `{"$guid": ...}` markers. Ids
/// synthesized by the planner are random UUIDs and never collide with caller
/// ids, even when a caller passes the same UUID text as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GuidId {
    Int(i64),
    Str(String),
    Uuid(Uuid),
}

impl GuidId {
    pub(crate) fn generate() -> GuidId {
        GuidId::Uuid(Uuid::new_v4())
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, GuidId::Uuid(_))
    }

    /// Parses the payload of a `{"$guid": ...}` marker.
    pub(crate) fn from_json(value: &serde_json::Value) -> Option<GuidId> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(GuidId::Int),
            serde_json::Value::String(s) => Some(GuidId::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for GuidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidId::Int(id) => write!(f, "{id}"),
            GuidId::Str(id) => write!(f, "{id:?}"),
            GuidId::Uuid(id) => write!(f, "<{id}>"),
        }
    }
}

impl From<i64> for GuidId {
    fn from(value: i64) -> GuidId {
        GuidId::Int(value)
    }
}

impl From<i32> for GuidId {
    fn from(value: i32) -> GuidId {
        GuidId::Int(value.into())
    }
}

impl From<&str> for GuidId {
    fn from(value: &str) -> GuidId {
        GuidId::Str(value.to_string())
    }
}

impl From<String> for GuidId {
    fn from(value: String) -> GuidId {
        GuidId::Str(value)
    }
}
