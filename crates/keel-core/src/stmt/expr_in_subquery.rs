use super::{Expr, Query};

/// `expr IN (SELECT column FROM ...)`. The query selects exactly one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInSubquery {
    pub expr: Box<Expr>,
    pub query: Box<Query>,
}

impl Expr {
    pub fn in_subquery(expr: impl Into<Expr>, query: impl Into<Query>) -> Expr {
        ExprInSubquery {
            expr: Box::new(expr.into()),
            query: Box::new(query.into()),
        }
        .into()
    }
}

impl From<ExprInSubquery> for Expr {
    fn from(value: ExprInSubquery) -> Self {
        Expr::InSubquery(value)
    }
}
