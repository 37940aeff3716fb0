use super::{FieldValue, GuidId, Operation};

use indexmap::IndexMap;

/// A row-level object of a nested mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub operation: Operation,

    pub identifying_fields: Option<Vec<String>>,

    pub fields: IndexMap<String, FieldValue>,

    /// Nested rows, keyed by their table.
    pub children: IndexMap<String, Vec<Row>>,
}

impl Row {
    pub fn new(operation: Operation) -> Row {
        Row {
            operation,
            identifying_fields: None,
            fields: IndexMap::new(),
            children: IndexMap::new(),
        }
    }

    pub fn create() -> Row {
        Row::new(Operation::Create)
    }

    pub fn update() -> Row {
        Row::new(Operation::Update)
    }

    pub fn delete() -> Row {
        Row::new(Operation::Delete)
    }

    pub fn upsert() -> Row {
        Row::new(Operation::Upsert)
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Row {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets `field` to the placeholder `id`.
    pub fn guid(self, field: impl Into<String>, id: impl Into<GuidId>) -> Row {
        self.set(field, FieldValue::Guid(id.into()))
    }

    pub fn identified_by<I, S>(mut self, fields: I) -> Row
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifying_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Nests `rows` of `table` under this row.
    pub fn child(mut self, table: impl Into<String>, rows: impl IntoIterator<Item = Row>) -> Row {
        self.children.entry(table.into()).or_default().extend(rows);
        self
    }
}
