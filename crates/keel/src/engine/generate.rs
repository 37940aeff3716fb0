mod delete;
mod insert;
mod lookup;
mod update;
mod value;

use super::{Batch, GuidValues, Plan};
use crate::mutation::{GuidId, Operation, PieceId};
use keel_core::{bail, driver, Result, Schema};

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Turns planned pieces into driver operations, one batch at a time.
pub(crate) struct Generate<'a> {
    schema: &'a Schema,
    plan: &'a Plan,

    /// Values written by batches that already ran.
    values: &'a GuidValues,

    /// Placeholders that some piece reads. Only these are looked up after
    /// their write.
    pending: &'a HashSet<GuidId>,

    allow_ambiguous: bool,
}

impl<'a> Generate<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        plan: &'a Plan,
        values: &'a GuidValues,
        pending: &'a HashSet<GuidId>,
        allow_ambiguous: bool,
    ) -> Generate<'a> {
        Generate {
            schema,
            plan,
            values,
            pending,
            allow_ambiguous,
        }
    }

    /// Operations for one batch round trip.
    ///
    /// Lookups for deleted rows come first, while the rows still exist. Then
    /// the writes, one group per `(table, operation)`. Lookups for created
    /// and updated rows come last.
    pub(crate) fn batch(&self, batch: Batch) -> Result<Vec<driver::Operation>> {
        let mut operations = self.lookups(batch, Operation::is_delete)?;

        let mut groups: IndexMap<(&str, Operation), Vec<PieceId>> = IndexMap::new();

        for (id, piece) in self.plan.batch_pieces(batch) {
            groups
                .entry((piece.table.as_str(), piece.operation))
                .or_default()
                .push(id);
        }

        for ((table, operation), ids) in &groups {
            match operation {
                Operation::Create => operations.push(self.insert(table, ids)?),
                Operation::Update => {
                    for id in ids {
                        operations.extend(self.update(*id)?);
                    }
                }
                Operation::Delete => operations.push(self.delete(table, ids)?),
                Operation::Upsert => {
                    bail!(
                        "{} reached statement generation as an unresolved upsert",
                        self.plan.pieces[ids[0]].path
                    );
                }
            }
        }

        operations.extend(self.lookups(batch, |operation| {
            operation.is_create() || operation.is_update()
        })?);

        debug!(
            batch = ?batch.range(),
            operations = operations.len(),
            "generated batch"
        );

        Ok(operations)
    }
}

fn piece_indices(ids: &[PieceId]) -> Vec<usize> {
    ids.iter().map(|id| id.index()).collect()
}
