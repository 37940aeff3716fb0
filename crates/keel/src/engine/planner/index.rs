use crate::mutation::{FieldValue, Operation, Piece, PieceId};
use keel_core::Schema;

use index_vec::IndexVec;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Pieces keyed by the values they hold in linking, primary-key and unique
/// fields, so the graph builder can find "who else touches this row" without
/// scanning every piece.
pub(super) struct FieldIndex<'a> {
    entries: HashMap<(&'a str, &'a str, Operation), HashMap<String, Vec<PieceId>>>,
}

impl<'a> FieldIndex<'a> {
    pub(super) fn build(schema: &'a Schema, pieces: &'a IndexVec<PieceId, Piece>) -> FieldIndex<'a> {
        let mut entries: HashMap<_, HashMap<String, Vec<PieceId>>> = HashMap::new();
        let mut fields_by_table: HashMap<&'a str, IndexSet<&'a str>> = HashMap::new();

        for (id, piece) in pieces.iter_enumerated() {
            let fields = fields_by_table
                .entry(&piece.table)
                .or_insert_with(|| indexed_fields(schema, &piece.table));

            for field in fields.iter() {
                let Some(key) = piece.get(field).and_then(FieldValue::index_key) else {
                    continue;
                };

                entries
                    .entry((piece.table.as_str(), *field, piece.operation))
                    .or_default()
                    .entry(key)
                    .or_default()
                    .push(id);
            }
        }

        FieldIndex { entries }
    }

    /// Pieces of `table` running `operation` whose `field` has the index key
    /// `key`, in piece order.
    pub(super) fn get(&self, table: &'a str, field: &'a str, operation: Operation, key: &str) -> &[PieceId] {
        self.entries
            .get(&(table, field, operation))
            .and_then(|values| values.get(key))
            .map(|ids| &ids[..])
            .unwrap_or(&[])
    }
}

fn indexed_fields<'a>(schema: &'a Schema, table: &str) -> IndexSet<&'a str> {
    let mut fields = IndexSet::new();

    for edge in schema.parent_edges(table) {
        fields.insert(edge.from_field.as_str());
    }

    for edge in schema.child_edges(table) {
        fields.insert(edge.to_field.as_str());
    }

    fields.extend(schema.primary_key(table).iter().map(String::as_str));

    for group in schema.unique_groups(table) {
        fields.extend(group.iter().map(String::as_str));
    }

    fields
}
