use super::Expr;

use std::fmt;

/// A multi-row insert.
///
/// When `returning` is non-empty the driver returns one row per inserted row,
/// in insert order, holding the listed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Expr>>,
    pub returning: Vec<String>,
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} ({}) VALUES ", self.table, self.columns.join(", "))?;

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("(")?;
            for (j, expr) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{expr}")?;
            }
            f.write_str(")")?;
        }

        if !self.returning.is_empty() {
            write!(f, " RETURNING {}", self.returning.join(", "))?;
        }

        Ok(())
    }
}
