use super::{FieldValue, Operation, Path};

use indexmap::IndexMap;

index_vec::define_index_type! {
    pub struct PieceId = u32;
}

/// One row-level operation, split out of a nested mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub table: String,

    pub operation: Operation,

    /// Caller override for the fields that identify the row. When set, the
    /// resolver uses it as-is.
    pub identifying_fields: Option<Vec<String>>,

    /// Field values, excluding nested child rows.
    pub record: IndexMap<String, FieldValue>,

    pub path: Path,

    /// The piece this one was nested under.
    pub parent: Option<PieceId>,

    /// Pieces nested directly under this one.
    pub children: Vec<PieceId>,
}

impl Piece {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.record.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.record.contains_key(field)
    }

    pub fn is_explicitly_identified_by(&self, field: &str) -> bool {
        self.identifying_fields
            .as_ref()
            .is_some_and(|fields| fields.iter().any(|f| f == field))
    }

    /// Placeholders whose value this piece's statement produces.
    pub fn write_guids(&self) -> impl Iterator<Item = (&str, &super::GuidId)> + '_ {
        self.record.iter().filter_map(|(field, value)| match value {
            FieldValue::Write(id) => Some((field.as_str(), id)),
            _ => None,
        })
    }
}
