mod eval;

mod violation;
pub use violation::Violation;

use keel_core::{
    async_trait,
    driver::{Operation, Row, Rows},
    err,
    stmt::{Delete, Insert, Statement, Update, Value},
    Driver, Error, Result, Schema,
};
use tracing::{debug, trace};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// An in-memory driver.
///
/// Each round trip applies to a copy of the store and is committed only when
/// every statement succeeds. After every write statement the store is checked
/// against the schema's primary keys, unique groups, and edges, so a batch
/// issued in the wrong order fails the way a relational database would.
#[derive(Debug, Default)]
pub struct Memory {
    store: Mutex<Store>,
}

#[derive(Debug, Default, Clone)]
struct Store {
    tables: HashMap<String, Table>,
}

#[derive(Debug, Clone)]
struct Table {
    rows: Vec<Row>,

    /// Next value handed out for a missing single-column integer key. Seeded
    /// keys are folded in on the next insert.
    next_id: i64,
}

impl Default for Table {
    fn default() -> Table {
        Table {
            rows: vec![],
            next_id: 1,
        }
    }
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Loads rows without checking constraints.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) -> Result<()> {
        let mut store = self.lock()?;
        let table = store.tables.entry(table.to_string()).or_default();

        table.rows.extend(rows);

        Ok(())
    }

    /// Returns a snapshot of the rows currently stored in `table`.
    pub fn rows(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.lock()?.rows(table).to_vec())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| err!("memory store lock poisoned"))
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> Result<Vec<Rows>> {
        let mut store = self.lock()?;
        let mut staged = store.clone();
        let mut responses = Vec::with_capacity(operations.len());

        debug!(operations = operations.len(), "memory round trip");

        for operation in &operations {
            trace!(purpose = ?operation.purpose, stmt = %operation.stmt, "exec");

            let rows = match &operation.stmt {
                Statement::Query(query) => staged.query(query)?,
                Statement::Insert(insert) => staged.insert(schema, insert)?,
                Statement::Update(update) => staged.update(update)?,
                Statement::Delete(delete) => staged.delete(delete)?,
            };

            if operation.is_write() {
                staged.verify(schema).map_err(Error::driver_operation_failed)?;
            }

            responses.push(rows);
        }

        *store = staged;
        Ok(responses)
    }
}

impl Store {
    fn rows(&self, table: &str) -> &[Row] {
        self.tables
            .get(table)
            .map(|table| &table.rows[..])
            .unwrap_or(&[])
    }

    fn insert(&mut self, schema: &Schema, insert: &Insert) -> Result<Rows> {
        // Every value is evaluated against the state before the statement
        let mut rows = Vec::with_capacity(insert.rows.len());
        for values in &insert.rows {
            if values.len() != insert.columns.len() {
                return Err(err!(
                    "insert into {} has {} columns but a row of {} values",
                    insert.table,
                    insert.columns.len(),
                    values.len()
                ));
            }

            let mut row = Row::new();
            for (column, expr) in insert.columns.iter().zip(values) {
                row.insert(column.clone(), self.eval(expr, None)?);
            }
            rows.push(row);
        }

        let auto_increment = match schema.primary_key(&insert.table) {
            [field] => Some(field.clone()),
            _ => None,
        };

        let table = self.tables.entry(insert.table.clone()).or_default();
        let mut returned = vec![];

        if let Some(field) = &auto_increment {
            table.next_id = table
                .rows
                .iter()
                .filter_map(|row| row.get(field)?.as_i64())
                .fold(table.next_id, |next, id| next.max(id.saturating_add(1)));
        }

        for mut row in rows {
            if let Some(field) = &auto_increment {
                match row.get(field).cloned().unwrap_or_default() {
                    Value::I64(id) => table.next_id = table.next_id.max(id.saturating_add(1)),
                    Value::Null => {
                        row.insert(field.clone(), Value::I64(table.next_id));
                        table.next_id = table.next_id.saturating_add(1);
                    }
                    _ => {}
                }
            }

            if !insert.returning.is_empty() {
                returned.push(project(&row, &insert.returning));
            }

            table.rows.push(row);
        }

        Ok(returned)
    }

    fn update(&mut self, update: &Update) -> Result<Rows> {
        let mut changed = vec![];

        for (index, row) in self.rows(&update.table).iter().enumerate() {
            if !self.matches(&update.filter, Some(row))? {
                continue;
            }

            let mut row = row.clone();
            for (column, expr) in update.assignments.iter() {
                let value = self.eval(expr, Some(&row))?;
                row.insert(column.clone(), value);
            }
            changed.push((index, row));
        }

        trace!(table = %update.table, rows = changed.len(), "updated");

        if let Some(table) = self.tables.get_mut(&update.table) {
            for (index, row) in changed {
                table.rows[index] = row;
            }
        }

        Ok(vec![])
    }

    fn delete(&mut self, delete: &Delete) -> Result<Rows> {
        let mut keep = Vec::with_capacity(self.rows(&delete.table).len());
        for row in self.rows(&delete.table) {
            keep.push(!self.matches(&delete.filter, Some(row))?);
        }

        trace!(
            table = %delete.table,
            rows = keep.iter().filter(|keep| !**keep).count(),
            "deleted"
        );

        if let Some(table) = self.tables.get_mut(&delete.table) {
            let mut keep = keep.into_iter();
            table.rows.retain(|_| keep.next().unwrap_or(true));
        }

        Ok(vec![])
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or_default();
            (column.clone(), value)
        })
        .collect()
}
