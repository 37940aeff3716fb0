use super::{piece_indices, Generate};
use crate::mutation::{FieldValue, PieceId};
use keel_core::{
    driver::{Operation, Purpose},
    stmt::{Expr, Insert},
    Result,
};

use indexmap::{IndexMap, IndexSet};

impl Generate<'_> {
    /// One multi-row insert for every create of `table` in the batch.
    ///
    /// Columns are the union of the fields any row sets. Fields written by
    /// the store are left out of the column list and returned instead, in
    /// row order.
    pub(super) fn insert(&self, table: &str, ids: &[PieceId]) -> Result<Operation> {
        let mut columns = IndexSet::new();
        let mut returning = IndexSet::new();
        let mut values = Vec::with_capacity(ids.len());

        for id in ids {
            let piece = &self.plan.pieces[*id];
            let mut row = IndexMap::new();

            for (field, value) in &piece.record {
                if let FieldValue::Write(_) = value {
                    returning.insert(field.clone());
                }

                if let Some(expr) = self.value_expr(piece, field)? {
                    columns.insert(field.clone());
                    row.insert(field.as_str(), expr);
                }
            }

            values.push(row);
        }

        let rows: Vec<Vec<Expr>> = values
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|column| row.swap_remove(column.as_str()).unwrap_or_else(Expr::null))
                    .collect()
            })
            .collect();

        let stmt = Insert {
            table: table.to_string(),
            columns: columns.into_iter().collect(),
            rows,
            returning: returning.into_iter().collect(),
        };

        Ok(Operation::new(Purpose::Write, stmt, piece_indices(ids)))
    }
}
