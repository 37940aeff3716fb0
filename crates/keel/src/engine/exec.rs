use super::{
    generate::Generate,
    matcher::{BatchRows, Matcher},
    Batch, Engine, GuidValues, MutationResult, Plan,
};
use crate::mutation::{GuidId, Operation, PieceId};
use keel_core::{
    driver::{self, Rows},
    err,
    stmt::{Statement, Value},
    Error, Result,
};

use index_vec::IndexVec;
use std::collections::HashSet;
use tracing::{debug, trace};

struct Exec<'a> {
    engine: &'a Engine,
    plan: Plan,

    /// Placeholders read by some piece.
    pending: HashSet<GuidId>,

    values: GuidValues,
    rows: IndexVec<PieceId, Option<driver::Row>>,
}

impl Engine {
    /// Runs a plan batch by batch. A batch only starts once the previous
    /// round trip has returned and its rows have been matched.
    pub(crate) async fn exec_plan(&self, plan: Plan) -> Result<MutationResult> {
        let pending = plan.read_guids();
        let rows = IndexVec::from_vec(vec![None; plan.pieces.len()]);

        let mut exec = Exec {
            engine: self,
            plan,
            pending,
            values: GuidValues::default(),
            rows,
        };

        let batches = exec.plan.batches.clone();

        for (index, batch) in batches.into_iter().enumerate() {
            exec.exec_batch(batch)
                .await
                .map_err(|err| err.context(format!("batch {index}")))?;
        }

        Ok(MutationResult {
            pieces: exec.plan.pieces,
            batches: exec.plan.batches,
            guids: exec.values,
            rows: exec.rows,
        })
    }
}

impl Exec<'_> {
    async fn exec_batch(&mut self, batch: Batch) -> Result<()> {
        if self
            .plan
            .batch_pieces(batch)
            .any(|(_, piece)| piece.operation.is_upsert())
        {
            self.resolve_upserts(batch).await?;
        }

        let operations = self.generate().batch(batch)?;

        if operations.is_empty() {
            return Ok(());
        }

        let rows = self.round_trip(operations).await?;
        self.record(batch, &rows)
    }

    /// Probes for the rows the batch's upserts target and turns each upsert
    /// into an update when its row exists, a create otherwise.
    async fn resolve_upserts(&mut self, batch: Batch) -> Result<()> {
        let operations = self.generate().probes(batch)?;
        let rows = self.round_trip(operations).await?;

        let resolved: Vec<(PieceId, Option<driver::Row>)> = self
            .matcher(batch, &rows)
            .match_batch()?
            .into_iter()
            .filter(|(id, _)| self.plan.pieces[*id].operation.is_upsert())
            .map(|(id, row)| (id, row.cloned()))
            .collect();

        for (id, row) in resolved {
            let piece = &mut self.plan.pieces[id];

            piece.operation = match row {
                Some(_) => Operation::Update,
                None => Operation::Create,
            };

            debug!(path = %piece.path, operation = %piece.operation, "resolved upsert");

            self.rows[id] = row;
        }

        Ok(())
    }

    /// Records the values written by the batch's placeholders and the row
    /// each piece matched.
    fn record(&mut self, batch: Batch, rows: &BatchRows) -> Result<()> {
        let mut written: Vec<(GuidId, Value)> = vec![];
        let mut matched_rows = vec![];

        for (id, row) in self.matcher(batch, rows).match_batch()? {
            let Some(row) = row else {
                continue;
            };

            for (field, guid) in self.plan.pieces[id].write_guids() {
                if let Some(value) = row.get(field) {
                    written.push((guid.clone(), value.clone()));
                }
            }

            matched_rows.push((id, row.clone()));
        }

        for (guid, value) in written {
            trace!(guid = %guid, value = %value, "resolved placeholder");
            self.values.insert(guid, value);
        }

        for (id, row) in matched_rows {
            self.rows[id] = Some(row);
        }

        Ok(())
    }

    /// Sends one round trip to the driver and groups what came back.
    async fn round_trip(&self, operations: Vec<driver::Operation>) -> Result<BatchRows> {
        let engine = self.engine;
        let issued = operations.len();

        debug!(operations = issued, "dispatching round trip");

        let responses = engine
            .driver
            .exec(&engine.schema, operations.clone())
            .await?;

        if responses.len() != issued {
            return Err(Error::row_count_mismatch(issued, responses.len()));
        }

        let mut rows = BatchRows::default();

        for (operation, response) in operations.into_iter().zip(responses) {
            collect_rows(&mut rows, operation, response)?;
        }

        Ok(rows)
    }

    fn generate(&self) -> Generate<'_> {
        Generate::new(
            &self.engine.schema,
            &self.plan,
            &self.values,
            &self.pending,
            self.engine.options.allow_ambiguous_identifying_key,
        )
    }

    fn matcher<'a>(&'a self, batch: Batch, rows: &'a BatchRows) -> Matcher<'a> {
        Matcher::new(
            &self.engine.schema,
            &self.plan,
            &self.values,
            batch,
            rows,
            self.engine.options.allow_ambiguous_identifying_key,
        )
    }
}

fn collect_rows(rows: &mut BatchRows, operation: driver::Operation, response: Rows) -> Result<()> {
    match &operation.stmt {
        Statement::Insert(insert) if !insert.returning.is_empty() => {
            if response.len() != operation.pieces.len() {
                return Err(err!(
                    "insert into `{}` returned {} rows for {} inserted",
                    insert.table,
                    response.len(),
                    operation.pieces.len()
                ));
            }

            for (piece, row) in operation.pieces.iter().zip(response) {
                rows.returned.insert(PieceId::from_usize(*piece), row);
            }
        }
        Statement::Query(query) => {
            rows.lookups
                .entry(query.table.clone())
                .or_default()
                .extend(response);
        }
        Statement::Insert(_) | Statement::Update(_) | Statement::Delete(_) => {}
    }

    Ok(())
}
