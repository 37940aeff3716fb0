use super::Path;
use keel_core::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,

    /// Create the row unless it already exists, in which case update it. The
    /// choice is made against the store right before the row's batch runs.
    Upsert,
}

impl Operation {
    pub(crate) fn parse(path: &Path, name: &str) -> Result<Operation> {
        Ok(match name {
            "create" => Operation::Create,
            "update" => Operation::Update,
            "delete" => Operation::Delete,
            "upsert" => Operation::Upsert,
            _ => return Err(Error::unrecognized_operation(path, name)),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Upsert => "upsert",
        }
    }

    pub fn is_create(self) -> bool {
        matches!(self, Operation::Create)
    }

    pub fn is_update(self) -> bool {
        matches!(self, Operation::Update)
    }

    pub fn is_delete(self) -> bool {
        matches!(self, Operation::Delete)
    }

    pub fn is_upsert(self) -> bool {
        matches!(self, Operation::Upsert)
    }

    /// Whether the operation targets an existing row and so needs a set of
    /// fields that single it out.
    pub fn targets_existing_row(self) -> bool {
        !self.is_create()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
