use std::fmt;

/// A schema-declared foreign-key relation `from_table.from_field →
/// to_table.to_field`.
///
/// The row in `from_table` holds the foreign key; the row in `to_table` is the
/// referenced (parent) row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub from_table: String,
    pub from_field: String,
    pub to_table: String,
    pub to_field: String,
}

/// Uniquely identifies an edge within a schema
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct EdgeId(pub usize);

impl Edge {
    pub fn is_self_referencing(&self) -> bool {
        self.from_table == self.to_table
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_table, self.from_field, self.to_table, self.to_field
        )
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EdgeId({})", self.0)
    }
}
