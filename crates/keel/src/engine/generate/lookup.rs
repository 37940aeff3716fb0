use super::{piece_indices, Generate};
use crate::{
    engine::{identify, Batch},
    mutation::{GuidId, Operation, PieceId},
};
use keel_core::{
    driver::{self, Purpose},
    stmt::{Expr, Query},
    Result,
};

use indexmap::{IndexMap, IndexSet};

impl Generate<'_> {
    /// Queries reading back the values other pieces wait on.
    ///
    /// One query per table, covering the pieces of the batch that match
    /// `filter`, aren't inserts and write at least one wanted placeholder.
    /// Each selects those placeholder fields plus the identifying fields used
    /// to match rows back to pieces.
    pub(super) fn lookups(
        &self,
        batch: Batch,
        filter: impl Fn(Operation) -> bool,
    ) -> Result<Vec<driver::Operation>> {
        let mut tables: IndexMap<&str, Vec<PieceId>> = IndexMap::new();

        for (id, piece) in self.plan.batch_pieces(batch) {
            // Inserts return their generated values directly
            if piece.operation.is_create() || !filter(piece.operation) {
                continue;
            }

            if piece.write_guids().any(|(_, guid)| self.wants_value(guid)) {
                tables.entry(&piece.table).or_default().push(id);
            }
        }

        tables
            .into_iter()
            .map(|(table, ids)| self.lookup(Purpose::Lookup, table, &ids, true))
            .collect()
    }

    /// Queries telling which upserts of the batch already have a row.
    pub(crate) fn probes(&self, batch: Batch) -> Result<Vec<driver::Operation>> {
        let mut tables: IndexMap<&str, Vec<PieceId>> = IndexMap::new();

        for (id, piece) in self.plan.batch_pieces(batch) {
            if piece.operation.is_upsert() {
                tables.entry(&piece.table).or_default().push(id);
            }
        }

        tables
            .into_iter()
            .map(|(table, ids)| self.lookup(Purpose::Probe, table, &ids, false))
            .collect()
    }

    /// A placeholder is read back when a later piece waits on it or when the
    /// caller named it and expects it in the result.
    fn wants_value(&self, guid: &GuidId) -> bool {
        self.pending.contains(guid) || !guid.is_generated()
    }

    fn lookup(
        &self,
        purpose: Purpose,
        table: &str,
        ids: &[PieceId],
        with_pending: bool,
    ) -> Result<driver::Operation> {
        let mut columns = IndexSet::new();
        let mut clauses = Vec::with_capacity(ids.len());

        for id in ids {
            let piece = &self.plan.pieces[*id];
            let key = identify::require_identifying_key(self.schema, piece, self.allow_ambiguous)?;

            columns.extend(key);

            if with_pending {
                columns.extend(
                    piece
                        .write_guids()
                        .filter(|(_, guid)| self.wants_value(guid))
                        .map(|(field, _)| field.to_string()),
                );
            }

            clauses.push(self.identifying_filter(*id)?);
        }

        let query = Query::new(
            table,
            columns.into_iter().collect(),
            Expr::or_from_iter(clauses),
        );

        Ok(driver::Operation::new(purpose, query, piece_indices(ids)))
    }
}
