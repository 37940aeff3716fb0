use super::{Assignments, Expr};

use std::fmt;

/// `UPDATE table SET assignments WHERE filter`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Assignments,
    pub filter: Expr,
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        for (i, (column, expr)) in self.assignments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column} = {expr}")?;
        }
        write!(f, " WHERE {}", self.filter)
    }
}
