use super::Store;
use keel_core::{
    driver::Row,
    err,
    stmt::{BinaryOp, Expr, Query, Value},
    Result,
};

impl Store {
    /// Evaluates `expr`, resolving columns against `row`.
    pub(crate) fn eval(&self, expr: &Expr, row: Option<&Row>) -> Result<Value> {
        Ok(match expr {
            Expr::Value(value) => value.clone(),
            Expr::Column(column) => {
                let Some(row) = row else {
                    return Err(err!("column `{}` referenced outside a row", column.name));
                };
                row.get(&column.name).cloned().unwrap_or_default()
            }
            Expr::BinaryOp(expr) => {
                let lhs = self.eval(&expr.lhs, row)?;
                let rhs = self.eval(&expr.rhs, row)?;

                // Comparisons against null never hold
                if lhs.is_null() || rhs.is_null() {
                    Value::Bool(false)
                } else {
                    Value::Bool(match expr.op {
                        BinaryOp::Eq => lhs == rhs,
                        BinaryOp::Ne => lhs != rhs,
                    })
                }
            }
            Expr::And(expr) => {
                for operand in &expr.operands {
                    if !self.matches(operand, row)? {
                        return Ok(Value::Bool(false));
                    }
                }
                Value::Bool(true)
            }
            Expr::Or(expr) => {
                for operand in &expr.operands {
                    if self.matches(operand, row)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Value::Bool(false)
            }
            Expr::IsNull(expr) => Value::Bool(self.eval(&expr.expr, row)?.is_null()),
            Expr::InSubquery(expr) => {
                let value = self.eval(&expr.expr, row)?;

                if value.is_null() {
                    return Ok(Value::Bool(false));
                }

                let found = self
                    .query(&expr.query)?
                    .into_iter()
                    .filter_map(|row| row.into_values().next())
                    .any(|candidate| candidate == value);

                Value::Bool(found)
            }
            Expr::Stmt(expr) => self
                .query(&expr.query)?
                .into_iter()
                .next()
                .and_then(|row| row.into_values().next())
                .unwrap_or_default(),
        })
    }

    pub(crate) fn matches(&self, expr: &Expr, row: Option<&Row>) -> Result<bool> {
        match self.eval(expr, row)? {
            Value::Bool(value) => Ok(value),
            Value::Null => Ok(false),
            other => Err(err!("filter evaluated to non-boolean value {other}")),
        }
    }

    /// Projects the rows of `query.table` matching its filter.
    pub(crate) fn query(&self, query: &Query) -> Result<Vec<Row>> {
        let mut rows = vec![];

        for row in self.rows(&query.table) {
            if self.matches(&query.filter, Some(row))? {
                rows.push(super::project(row, &query.columns));
            }
        }

        Ok(rows)
    }
}
