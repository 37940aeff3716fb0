use crate::mutation::{Mutation, Path, Piece, PieceId, Row};
use keel_core::{Error, Result, Schema};

use index_vec::IndexVec;
use std::collections::VecDeque;

/// Splits a nested mutation into a flat list of pieces.
///
/// Rows are visited breadth-first, so all top-level pieces come first, then
/// every depth-1 piece, and so on. Within a depth, rows keep the order they
/// appear in.
pub(crate) fn flatten(schema: &Schema, mutation: &Mutation) -> Result<IndexVec<PieceId, Piece>> {
    let mut pieces = IndexVec::new();
    let mut queue: VecDeque<(&str, &Row, Path, Option<PieceId>)> = VecDeque::new();

    for (table, rows) in mutation.tables() {
        for (index, row) in rows.iter().enumerate() {
            queue.push_back((table, row, Path::root(table, index), None));
        }
    }

    while let Some((table, row, path, parent)) = queue.pop_front() {
        if !schema.contains_table(table) {
            return Err(Error::invalid_mutation(format!(
                "{path} refers to unknown table `{table}`"
            )));
        }

        if let Some(fields) = &row.identifying_fields {
            if let Some(field) = fields.iter().find(|field| !row.fields.contains_key(*field)) {
                return Err(Error::invalid_mutation(format!(
                    "{path} is identified by `{field}` but does not set it"
                )));
            }
        }

        let id = pieces.next_idx();

        for (child_table, rows) in &row.children {
            for (index, child) in rows.iter().enumerate() {
                let child_path = path.child(child_table, index);
                queue.push_back((child_table.as_str(), child, child_path, Some(id)));
            }
        }

        pieces.push(Piece {
            table: table.to_string(),
            operation: row.operation,
            identifying_fields: row.identifying_fields.clone(),
            record: row.fields.clone(),
            path,
            parent,
            children: vec![],
        });

        if let Some(parent) = parent {
            pieces[parent].children.push(id);
        }
    }

    Ok(pieces)
}
