use super::{Delete, Insert, Query, Update};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(Delete),
    Insert(Insert),
    Query(Query),
    Update(Update),
}

impl Statement {
    /// The table the statement targets
    pub fn table(&self) -> &str {
        match self {
            Statement::Delete(stmt) => &stmt.table,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Query(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }

    pub fn as_insert(&self) -> Option<&Insert> {
        match self {
            Statement::Insert(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Statement::Query(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&Update> {
        match self {
            Statement::Update(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_delete(&self) -> Option<&Delete> {
        match self {
            Statement::Delete(stmt) => Some(stmt),
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Delete(stmt) => stmt.fmt(f),
            Statement::Insert(stmt) => stmt.fmt(f),
            Statement::Query(stmt) => stmt.fmt(f),
            Statement::Update(stmt) => stmt.fmt(f),
        }
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Query> for Statement {
    fn from(value: Query) -> Self {
        Statement::Query(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}
