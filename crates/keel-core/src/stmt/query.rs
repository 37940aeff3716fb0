use super::Expr;

use std::fmt;

/// `SELECT columns FROM table WHERE filter`
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: Vec<String>,
    pub filter: Expr,
}

impl Query {
    pub fn new(table: impl Into<String>, columns: Vec<String>, filter: impl Into<Expr>) -> Query {
        Query {
            table: table.into(),
            columns,
            filter: filter.into(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SELECT {} FROM {} WHERE {}",
            self.columns.join(", "),
            self.table,
            self.filter
        )
    }
}
