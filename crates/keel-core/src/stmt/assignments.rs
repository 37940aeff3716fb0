use super::Expr;

use indexmap::IndexMap;
use std::ops;

/// Column assignments of an update, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    assignments: IndexMap<String, Expr>,
}

impl Assignments {
    pub fn set(&mut self, column: impl Into<String>, expr: impl Into<Expr>) {
        self.assignments.insert(column.into(), expr.into());
    }

    pub fn get(&self, column: &str) -> Option<&Expr> {
        self.assignments.get(column)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&String, &Expr)> + '_ {
        self.assignments.iter()
    }
}

impl ops::Deref for Assignments {
    type Target = IndexMap<String, Expr>;

    fn deref(&self) -> &Self::Target {
        &self.assignments
    }
}
