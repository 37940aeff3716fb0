use super::Generate;
use crate::{engine::identify, mutation::PieceId};
use keel_core::{
    driver::{Operation, Purpose},
    stmt::{Assignments, Update},
    Result,
};

use tracing::trace;

impl Generate<'_> {
    /// The update for one piece, or `None` when nothing is left to assign.
    pub(super) fn update(&self, id: PieceId) -> Result<Option<Operation>> {
        let piece = &self.plan.pieces[id];
        let key = identify::require_identifying_key(self.schema, piece, self.allow_ambiguous)?;

        let mut assignments = Assignments::default();

        for field in piece.record.keys() {
            if key.contains(field) {
                continue;
            }

            if let Some(expr) = self.value_expr(piece, field)? {
                assignments.set(field.clone(), expr);
            }
        }

        if assignments.is_empty() {
            trace!(path = %piece.path, "nothing to assign; skipping update");
            return Ok(None);
        }

        let stmt = Update {
            table: piece.table.clone(),
            assignments,
            filter: self.identifying_filter(id)?,
        };

        Ok(Some(Operation::new(Purpose::Write, stmt, vec![id.index()])))
    }
}
