use super::{Edge, EdgeId, Schema, Table};
use crate::Result;

use indexmap::IndexMap;

/// Assembles a [`Schema`].
///
/// Declarations are recorded as given and checked together in
/// [`Builder::build`], so tables may be declared after the edges that
/// reference them.
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<(String, Vec<String>)>,
    unique: Vec<(String, Vec<String>)>,
    edges: Vec<(String, String, String, String)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn table<I, S>(mut self, name: impl Into<String>, primary_key: I) -> Builder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.push((
            name.into(),
            primary_key.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn unique<I, S>(mut self, table: impl Into<String>, fields: I) -> Builder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique
            .push((table.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    pub fn edge(
        mut self,
        from_table: impl Into<String>,
        from_field: impl Into<String>,
        to_table: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Builder {
        self.edges.push((
            from_table.into(),
            from_field.into(),
            to_table.into(),
            to_field.into(),
        ));
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut tables = IndexMap::new();

        for (name, primary_key) in self.tables {
            if tables.contains_key(&name) {
                return Err(crate::Error::invalid_schema(format!(
                    "table `{name}` declared more than once"
                )));
            }

            tables.insert(name.clone(), Table::new(name, primary_key));
        }

        let mut schema = Schema {
            tables,
            edges: vec![],
        };

        for (table, fields) in self.unique {
            let Some(entry) = schema.tables.get_mut(&table) else {
                return Err(crate::Error::invalid_schema(format!(
                    "unique group ({}) references unknown table `{table}`",
                    fields.join(", ")
                )));
            };
            entry.unique.push(fields);
        }

        for (from_table, from_field, to_table, to_field) in self.edges {
            let id = EdgeId(schema.edges.len());
            schema.edges.push(Edge {
                id,
                from_table,
                from_field,
                to_table,
                to_field,
            });
        }

        schema.verify()?;

        // Derive the per-table edge lists once the edges are known to be
        // valid.
        for edge in &schema.edges {
            if let Some(table) = schema.tables.get_mut(&edge.from_table) {
                table.parent_edges.push(edge.id);
            }

            if let Some(table) = schema.tables.get_mut(&edge.to_table) {
                table.child_edges.push(edge.id);
            }
        }

        Ok(schema)
    }
}
