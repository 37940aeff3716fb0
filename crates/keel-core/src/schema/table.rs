use super::EdgeId;

/// A table as seen by the write path: its primary key, its unique field
/// groups, and the edges that touch it.
#[derive(Debug)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// Fields composing the primary key
    pub primary_key: Vec<String>,

    /// Unique field groups, in declaration order. The primary key is not
    /// repeated here unless it was declared unique explicitly.
    pub unique: Vec<Vec<String>>,

    /// Edges where this table holds the foreign key.
    pub(crate) parent_edges: Vec<EdgeId>,

    /// Edges where this table is the referenced side.
    pub(crate) child_edges: Vec<EdgeId>,
}

impl Table {
    pub(crate) fn new(name: String, primary_key: Vec<String>) -> Table {
        Table {
            name,
            primary_key,
            unique: vec![],
            parent_edges: vec![],
            child_edges: vec![],
        }
    }

    pub fn is_primary_key(&self, fields: &[String]) -> bool {
        same_fields(&self.primary_key, fields)
    }

    pub fn is_primary_key_field(&self, field: &str) -> bool {
        self.primary_key.iter().any(|pk| pk == field)
    }
}

/// Order-insensitive comparison of two field groups.
pub(crate) fn same_fields(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|field| b.contains(field))
}
