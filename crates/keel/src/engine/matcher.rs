use super::{identify, Batch, GuidValues, Plan};
use crate::mutation::{FieldValue, GuidId, PieceId};
use keel_core::{driver, stmt::Value, Result, Schema};

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Rows one round trip returned, grouped for matching.
#[derive(Debug, Default)]
pub(crate) struct BatchRows {
    /// Rows returned by lookup queries, by table.
    pub(crate) lookups: IndexMap<String, Vec<driver::Row>>,

    /// Rows returned by inserts, by the piece each was inserted for.
    pub(crate) returned: HashMap<PieceId, driver::Row>,
}

/// Associates returned rows with the pieces of a batch.
///
/// A piece is found through its identifying fields. Literal values are used
/// directly. Read placeholders resolve through values recorded by earlier
/// batches or, failing that, through the row matched for the piece that
/// writes them, which may hop through further placeholders.
///
/// Pieces resolving to the same values match the same row.
pub(crate) struct Matcher<'a> {
    schema: &'a Schema,
    plan: &'a Plan,
    values: &'a GuidValues,
    batch: Batch,
    rows: &'a BatchRows,
    allow_ambiguous: bool,

    /// Per `(table, key fields)`, the serialized key values of each returned
    /// row mapped to the row's position. The first row wins.
    indices: HashMap<(&'a str, Vec<String>), HashMap<String, usize>>,

    matched: HashMap<PieceId, Option<&'a driver::Row>>,

    /// Pieces being resolved; guards against placeholder chains that loop.
    visiting: HashSet<PieceId>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        plan: &'a Plan,
        values: &'a GuidValues,
        batch: Batch,
        rows: &'a BatchRows,
        allow_ambiguous: bool,
    ) -> Matcher<'a> {
        Matcher {
            schema,
            plan,
            values,
            batch,
            rows,
            allow_ambiguous,
            indices: HashMap::new(),
            matched: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    /// Matches every piece of the batch, in piece order.
    pub(crate) fn match_batch(mut self) -> Result<IndexMap<PieceId, Option<&'a driver::Row>>> {
        let mut matched = IndexMap::with_capacity(self.batch.len());

        for id in self.batch.ids() {
            let row = self.row_for(id)?;
            matched.insert(id, row);
        }

        Ok(matched)
    }

    pub(crate) fn row_for(&mut self, id: PieceId) -> Result<Option<&'a driver::Row>> {
        if !self.batch.contains(id) {
            return Ok(None);
        }

        if let Some(row) = self.matched.get(&id) {
            return Ok(*row);
        }

        if !self.visiting.insert(id) {
            return Ok(None);
        }

        let row = self.find_row(id);
        self.visiting.remove(&id);

        let row = row?;
        self.matched.insert(id, row);
        Ok(row)
    }

    fn find_row(&mut self, id: PieceId) -> Result<Option<&'a driver::Row>> {
        let (plan, batch_rows) = (self.plan, self.rows);

        if let Some(row) = batch_rows.returned.get(&id) {
            return Ok(Some(row));
        }

        let piece = &plan.pieces[id];

        let Some(rows) = batch_rows.lookups.get(&piece.table) else {
            return Ok(None);
        };

        let key = identify::identifying_key(self.schema, piece, self.allow_ambiguous);
        if key.is_empty() {
            return Ok(None);
        }

        let mut values = Vec::with_capacity(key.len());

        for field in &key {
            let value = match piece.get(field) {
                Some(FieldValue::Literal(value)) => Some(value.clone()),
                Some(FieldValue::Read(guid)) => self.resolve(guid)?,
                _ => None,
            };

            let Some(value) = value else {
                return Ok(None);
            };

            values.push(value);
        }

        let needle = serde_json::to_string(&values)?;
        let index = self.index(&piece.table, key, rows)?;

        Ok(index.get(&needle).map(|position| &rows[*position]))
    }

    /// The value of placeholder `guid`, if it is known or can be read off
    /// the row matched for its writer.
    fn resolve(&mut self, guid: &GuidId) -> Result<Option<Value>> {
        if let Some(value) = self.values.get(guid) {
            return Ok(Some(value.clone()));
        }

        let plan = self.plan;

        let Some(write) = plan.guids.writer(guid) else {
            return Ok(None);
        };

        let row = self.row_for(write.piece)?;
        Ok(row.and_then(|row| row.get(&write.field)).cloned())
    }

    fn index(
        &mut self,
        table: &'a str,
        key: Vec<String>,
        rows: &'a [driver::Row],
    ) -> Result<&HashMap<String, usize>> {
        use std::collections::hash_map::Entry;

        match self.indices.entry((table, key)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut index = HashMap::new();

                for (position, row) in rows.iter().enumerate() {
                    let values: Option<Vec<&Value>> =
                        entry.key().1.iter().map(|field| row.get(field)).collect();

                    // Rows lacking a key column cannot be found by it
                    let Some(values) = values else {
                        continue;
                    };

                    index
                        .entry(serde_json::to_string(&values)?)
                        .or_insert(position);
                }

                Ok(entry.insert(index))
            }
        }
    }
}
