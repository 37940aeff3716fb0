use crate::{
    mutation::{FieldValue, GuidId, Operation, Piece, PieceId},
    Options,
};
use keel_core::Schema;

use index_vec::IndexVec;
use tracing::trace;

/// Fills in placeholders the caller left out.
///
/// A child nested under its parent gets a foreign key pointing at the parent
/// (or the other way around, depending on which side of the schema edge each
/// table is on). Then every piece missing primary-key fields gets a fresh
/// placeholder for each, so later stages can always refer to the row.
pub(crate) fn infer(schema: &Schema, pieces: &mut IndexVec<PieceId, Piece>, options: &Options) {
    if options.infer_guids {
        for id in pieces.indices() {
            infer_foreign_key(schema, pieces, id);
        }
    }

    for piece in pieces.iter_mut() {
        for field in schema.primary_key(&piece.table) {
            if !piece.contains(field) {
                let id = GuidId::generate();
                trace!(path = %piece.path, field, guid = %id, "assigned primary key placeholder");
                piece.record.insert(field.clone(), FieldValue::Guid(id));
            }
        }
    }
}

fn infer_foreign_key(schema: &Schema, pieces: &mut IndexVec<PieceId, Piece>, child: PieceId) {
    let Some(parent) = pieces[child].parent else {
        return;
    };

    if !propagates(pieces[parent].operation, pieces[child].operation) {
        return;
    }

    let parent_table = pieces[parent].table.clone();
    let child_table = pieces[child].table.clone();

    let mut edges = schema.edges_between(&parent_table, &child_table);
    let (Some(edge), None) = (edges.next(), edges.next()) else {
        trace!(
            path = %pieces[child].path,
            "no single edge between {parent_table} and {child_table}; skipping inference"
        );
        return;
    };

    // The side holding `to_field` is referenced. For a self-referencing
    // table, the nested row points at its parent.
    let (referenced, holder) = if edge.to_table == parent_table {
        (parent, child)
    } else {
        (child, parent)
    };

    if pieces[holder].contains(&edge.from_field) {
        return;
    }

    let value = match pieces[referenced].get(&edge.to_field) {
        Some(value) if value.is_null() => return,
        Some(value) => value.clone(),
        None => {
            let value = FieldValue::Guid(GuidId::generate());
            pieces[referenced]
                .record
                .insert(edge.to_field.clone(), value.clone());
            value
        }
    };

    trace!(
        holder = %pieces[holder].path,
        referenced = %pieces[referenced].path,
        %edge,
        "inferred foreign key"
    );

    pieces[holder].record.insert(edge.from_field.clone(), value);
}

/// Nesting pairs, `(parent, child)`, for which a foreign key is inferred.
fn propagates(parent: Operation, child: Operation) -> bool {
    use Operation::*;

    matches!(
        (parent, child),
        (Create, Create) | (Update, Update) | (Update, Delete) | (Delete, Delete)
    )
}
