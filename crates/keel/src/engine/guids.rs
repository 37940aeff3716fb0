use crate::mutation::{GuidId, PieceId};
use keel_core::stmt::Value;

use indexmap::IndexMap;

/// Where each placeholder is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuidMap {
    writes: IndexMap<GuidId, GuidWrite>,
}

/// The piece and field holding the first occurrence of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidWrite {
    pub piece: PieceId,
    pub field: String,
}

/// Placeholder values resolved so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuidValues {
    values: IndexMap<GuidId, Value>,
}

impl GuidMap {
    pub fn writer(&self, id: &GuidId) -> Option<&GuidWrite> {
        self.writes.get(id)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&GuidId, &GuidWrite)> + '_ {
        self.writes.iter()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Records `piece.field` as the writer of `id` unless one is known.
    /// Returns `true` when this call recorded the writer.
    pub(crate) fn record(&mut self, id: &GuidId, piece: PieceId, field: &str) -> bool {
        if self.writes.contains_key(id) {
            return false;
        }

        self.writes.insert(
            id.clone(),
            GuidWrite {
                piece,
                field: field.to_string(),
            },
        );
        true
    }
}

impl GuidValues {
    pub fn get(&self, id: &GuidId) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn contains(&self, id: &GuidId) -> bool {
        self.values.contains_key(id)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&GuidId, &Value)> + '_ {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, id: GuidId, value: Value) {
        self.values.insert(id, value);
    }
}
