use super::*;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// References a column of the target table
    Column(ExprColumn),

    /// The expression is contained by the given subquery
    InSubquery(ExprInSubquery),

    /// Whether an expression is null.
    IsNull(ExprIsNull),

    /// OR a set of expressions
    Or(ExprOr),

    /// Evaluate a single-column, single-row sub-select
    Stmt(ExprStmt),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns `true` if the expression is the `false` boolean expression
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }

    /// Returns true if the expression is a constant value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(..))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

macro_rules! impl_from_scalar {
    ( $($t:ty),+ ) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Expr::Value(value.into())
                }
            }
        )+
    };
}

impl_from_scalar!(bool, i32, i64, f64, String, &str);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(expr) => fmt_operands(f, &expr.operands, " AND "),
            Expr::BinaryOp(expr) => write!(f, "{} {} {}", expr.lhs, expr.op, expr.rhs),
            Expr::Column(expr) => f.write_str(&expr.name),
            Expr::InSubquery(expr) => write!(f, "{} IN ({})", expr.expr, expr.query),
            Expr::IsNull(expr) => write!(f, "{} IS NULL", expr.expr),
            Expr::Or(expr) => fmt_operands(f, &expr.operands, " OR "),
            Expr::Stmt(expr) => write!(f, "({})", expr.query),
            Expr::Value(value) => fmt::Display::fmt(value, f),
        }
    }
}

fn fmt_operands(f: &mut fmt::Formatter<'_>, operands: &[Expr], sep: &str) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }

        match operand {
            Expr::And(_) | Expr::Or(_) => write!(f, "({operand})")?,
            _ => write!(f, "{operand}")?,
        }
    }

    Ok(())
}
