mod field_value;
pub use field_value::FieldValue;

mod guid;
pub use guid::GuidId;

mod operation;
pub use operation::Operation;

mod parse;

mod path;
pub use path::{Path, PathStep};

mod piece;
pub use piece::{Piece, PieceId};

mod row;
pub use row::Row;

use indexmap::IndexMap;

/// A nested mutation: top-level rows keyed by table name.
///
/// Rows may nest child rows of related tables to any depth. Build one in code
/// with [`Mutation::table`] and [`Row`], or parse the JSON form with
/// [`Mutation::from_json`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutation {
    pub(crate) tables: IndexMap<String, Vec<Row>>,
}

impl Mutation {
    pub fn new() -> Mutation {
        Mutation::default()
    }

    /// Appends `rows` to the top-level rows of `table`.
    pub fn table(mut self, table: impl Into<String>, rows: impl IntoIterator<Item = Row>) -> Mutation {
        self.tables.entry(table.into()).or_default().extend(rows);
        self
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &[Row])> + '_ {
        self.tables
            .iter()
            .map(|(table, rows)| (table.as_str(), &rows[..]))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|rows| rows.is_empty())
    }
}
