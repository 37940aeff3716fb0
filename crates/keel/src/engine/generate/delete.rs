use super::{piece_indices, Generate};
use crate::mutation::PieceId;
use keel_core::{
    driver::{Operation, Purpose},
    stmt::{Delete, Expr},
    Result,
};

impl Generate<'_> {
    /// One delete covering every delete of `table` in the batch.
    pub(super) fn delete(&self, table: &str, ids: &[PieceId]) -> Result<Operation> {
        let clauses = ids
            .iter()
            .map(|id| self.identifying_filter(*id))
            .collect::<Result<Vec<_>>>()?;

        let stmt = Delete {
            table: table.to_string(),
            filter: Expr::or_from_iter(clauses),
        };

        Ok(Operation::new(Purpose::Write, stmt, piece_indices(ids)))
    }
}
