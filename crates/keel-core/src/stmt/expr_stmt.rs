use super::{Expr, Query};

/// A scalar sub-select: evaluates to the single column of the single row the
/// query returns, or null when it returns nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub query: Box<Query>,
}

impl Expr {
    pub fn stmt(query: impl Into<Query>) -> Expr {
        ExprStmt {
            query: Box::new(query.into()),
        }
        .into()
    }

    pub fn is_stmt(&self) -> bool {
        matches!(self, Self::Stmt(..))
    }
}

impl From<ExprStmt> for Expr {
    fn from(value: ExprStmt) -> Self {
        Expr::Stmt(value)
    }
}
