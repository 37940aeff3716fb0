use crate::stmt::Statement;

/// One statement handed to the driver, tagged with why it was issued and the
/// mutation pieces it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub purpose: Purpose,

    pub stmt: Statement,

    /// Indices, into the planned piece list, of the pieces this statement
    /// covers. For inserts the order matches the inserted rows.
    pub pieces: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Existence check used to resolve upserts before writing.
    Probe,

    /// Reads back the fields pending placeholders depend on.
    Lookup,

    /// Insert, update or delete.
    Write,
}

impl Operation {
    pub fn new(purpose: Purpose, stmt: impl Into<Statement>, pieces: Vec<usize>) -> Operation {
        Operation {
            purpose,
            stmt: stmt.into(),
            pieces,
        }
    }

    pub fn table(&self) -> &str {
        self.stmt.table()
    }

    pub fn is_write(&self) -> bool {
        matches!(self.purpose, Purpose::Write)
    }
}
