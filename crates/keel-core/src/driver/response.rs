use crate::stmt::Value;

use indexmap::IndexMap;

/// A row returned by the driver, keyed by column name.
pub type Row = IndexMap<String, Value>;

/// The rows returned for one operation.
pub type Rows = Vec<Row>;
