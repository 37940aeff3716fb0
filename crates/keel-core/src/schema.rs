mod builder;
pub use builder::Builder;

mod edge;
pub use edge::{Edge, EdgeId};

mod table;
pub use table::Table;

mod verify;

use indexmap::IndexMap;

/// Read-only description of the tables a mutation may touch.
///
/// The schema is immutable once built. Derived lookups (the edges leaving and
/// entering each table) are computed by [`Builder::build`] and stored here, so
/// repeated accessor calls are cheap.
#[derive(Debug)]
pub struct Schema {
    /// Tables, keyed by name, in declaration order.
    pub(crate) tables: IndexMap<String, Table>,

    /// Every declared foreign-key relation.
    pub(crate) edges: Vec<Edge>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.values()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Primary key fields of `table`; empty when the table is unknown.
    pub fn primary_key(&self, table: &str) -> &[String] {
        self.table(table)
            .map(|table| &table.primary_key[..])
            .unwrap_or(&[])
    }

    /// Unique field groups of `table`, in declaration order.
    pub fn unique_groups(&self, table: &str) -> &[Vec<String>] {
        self.table(table)
            .map(|table| &table.unique[..])
            .unwrap_or(&[])
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Edges whose `from_table` is `table`: the relations `table` holds a
    /// foreign key for.
    pub fn parent_edges<'a>(&'a self, table: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.table(table)
            .into_iter()
            .flat_map(|table| table.parent_edges.iter())
            .map(|id| self.edge(*id))
    }

    /// Edges whose `to_table` is `table`: the relations through which other
    /// rows reference `table`.
    pub fn child_edges<'a>(&'a self, table: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.table(table)
            .into_iter()
            .flat_map(|table| table.child_edges.iter())
            .map(|id| self.edge(*id))
    }

    /// Edges connecting `a` and `b` in either direction.
    pub fn edges_between<'a>(&'a self, a: &'a str, b: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.parent_edges(a)
            .filter(move |edge| edge.to_table == b)
            .chain(
                self.child_edges(a)
                    .filter(move |edge| edge.from_table == b && edge.from_table != edge.to_table),
            )
    }

    /// Returns `true` if `field` takes part in any edge of `table`, on either
    /// end.
    pub fn is_linking_field(&self, table: &str, field: &str) -> bool {
        self.parent_edges(table).any(|edge| edge.from_field == field)
            || self.child_edges(table).any(|edge| edge.to_field == field)
    }
}
