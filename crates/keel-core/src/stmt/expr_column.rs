use super::Expr;

/// References a column of the statement's target table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprColumn {
    pub name: String,
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Expr {
        ExprColumn { name: name.into() }.into()
    }

    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Expr::Column(expr_column) => Some(expr_column),
            _ => None,
        }
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Expr::Column(value)
    }
}
