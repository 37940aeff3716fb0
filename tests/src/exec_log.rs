use crate::logging_driver::DriverOp;
use keel_core::driver::{Operation, Purpose};

use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Number of round trips
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Statements of each round trip, rendered
    pub fn round_trips(&self) -> Vec<Vec<String>> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .map(|op| {
                op.operations
                    .iter()
                    .map(|operation| operation.stmt.to_string())
                    .collect()
            })
            .collect()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .flat_map(|op| &op.operations)
            .filter(|operation| predicate(operation))
            .count()
    }

    /// Number of upsert probes issued
    pub fn probes(&self) -> usize {
        self.count(|operation| operation.purpose == Purpose::Probe)
    }

    /// Number of statements that wrote to the store
    pub fn writes(&self) -> usize {
        self.count(Operation::is_write)
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first round trip from the log
    pub fn pop(&mut self) -> Option<DriverOp> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }
}
