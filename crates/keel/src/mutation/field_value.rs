use super::GuidId;
use keel_core::stmt::Value;

/// The value of one field in a mutation piece.
///
/// Placeholders start out as [`FieldValue::Guid`]. Once the pieces are in
/// their final order, the first occurrence of each guid becomes
/// [`FieldValue::Write`] and every later one [`FieldValue::Read`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Literal(Value),

    /// Placeholder not yet classified.
    Guid(GuidId),

    /// The first occurrence of a placeholder: the store supplies the value.
    Write(GuidId),

    /// A later occurrence of a placeholder: consumes the written value.
    Read(GuidId),
}

impl FieldValue {
    pub fn guid(&self) -> Option<&GuidId> {
        match self {
            FieldValue::Guid(id) | FieldValue::Write(id) | FieldValue::Read(id) => Some(id),
            FieldValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            FieldValue::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, FieldValue::Literal(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Literal(value) if value.is_null())
    }

    pub fn is_write(&self) -> bool {
        matches!(self, FieldValue::Write(_))
    }

    pub fn is_read(&self) -> bool {
        matches!(self, FieldValue::Read(_))
    }

    /// Whether the value can single out an existing row: a non-null literal,
    /// or a placeholder some earlier piece writes.
    pub fn is_concrete(&self) -> bool {
        match self {
            FieldValue::Literal(value) => !value.is_null(),
            FieldValue::Read(_) => true,
            FieldValue::Guid(_) | FieldValue::Write(_) => false,
        }
    }

    /// Key under which equal values collide in the planner's field index.
    ///
    /// Literals and placeholders never share a key, and the write/read
    /// distinction is ignored. Null has no key since it never references or
    /// collides with anything.
    pub(crate) fn index_key(&self) -> Option<String> {
        match self {
            FieldValue::Literal(value) if value.is_null() => None,
            FieldValue::Literal(value) => serde_json::to_string(value).ok(),
            _ => serde_json::to_string(&("$guid", self.guid()?)).ok(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> FieldValue {
        FieldValue::Literal(value)
    }
}

macro_rules! impl_from_scalar {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> FieldValue {
                    FieldValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i32, i64, f64, String, &str);
