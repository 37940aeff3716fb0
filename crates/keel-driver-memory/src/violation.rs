use super::Store;
use keel_core::{stmt::Value, Schema};

use std::fmt;

/// A constraint the store no longer satisfies after a write statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A primary key field was null.
    NullPrimaryKey { table: String, field: String },

    /// Two rows share the values of a primary key or unique group.
    Unique {
        table: String,
        fields: Vec<String>,
        values: Vec<Value>,
    },

    /// A foreign key names no row on the referenced side.
    ForeignKey {
        table: String,
        field: String,
        value: Value,
        referenced: String,
    },
}

impl std::error::Error for Violation {}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NullPrimaryKey { table, field } => {
                write!(f, "null value in primary key {table}.{field}")
            }
            Violation::Unique {
                table,
                fields,
                values,
            } => {
                let values = values.iter().map(Value::to_string).collect::<Vec<_>>();
                write!(
                    f,
                    "duplicate key ({}) = ({}) in {table}",
                    fields.join(", "),
                    values.join(", ")
                )
            }
            Violation::ForeignKey {
                table,
                field,
                value,
                referenced,
            } => write!(
                f,
                "{table}.{field} = {value} references no row in {referenced}"
            ),
        }
    }
}

impl Store {
    pub(crate) fn verify(&self, schema: &Schema) -> Result<(), Violation> {
        for table in schema.tables() {
            let rows = self.rows(&table.name);

            for row in rows {
                for field in &table.primary_key {
                    if row.get(field).map_or(true, Value::is_null) {
                        return Err(Violation::NullPrimaryKey {
                            table: table.name.clone(),
                            field: field.clone(),
                        });
                    }
                }
            }

            for fields in std::iter::once(&table.primary_key).chain(&table.unique) {
                let mut seen: Vec<Vec<&Value>> = vec![];

                for row in rows {
                    let Some(values) = fields
                        .iter()
                        .map(|field| row.get(field).filter(|value| !value.is_null()))
                        .collect::<Option<Vec<_>>>()
                    else {
                        // Groups with a null member never collide
                        continue;
                    };

                    if seen.contains(&values) {
                        return Err(Violation::Unique {
                            table: table.name.clone(),
                            fields: fields.clone(),
                            values: values.into_iter().cloned().collect(),
                        });
                    }
                    seen.push(values);
                }
            }
        }

        for edge in schema.edges() {
            let referenced = self.rows(&edge.to_table);

            for row in self.rows(&edge.from_table) {
                let Some(value) = row.get(&edge.from_field).filter(|value| !value.is_null())
                else {
                    continue;
                };

                if !referenced.iter().any(|r| r.get(&edge.to_field) == Some(value)) {
                    return Err(Violation::ForeignKey {
                        table: edge.from_table.clone(),
                        field: edge.from_field.clone(),
                        value: value.clone(),
                        referenced: edge.to_table.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
