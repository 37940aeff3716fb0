use keel_core::{
    async_trait,
    driver::{Driver, Operation, Rows},
    Result, Schema,
};

use std::sync::{Arc, Mutex};

/// A driver wrapper that logs every successful round trip.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Arc<dyn Driver>,

    /// Log of all round trips executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingDriver {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

/// One round trip and what came back.
#[derive(Debug, Clone)]
pub struct DriverOp {
    pub operations: Vec<Operation>,
    pub responses: Vec<Rows>,
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> Result<Vec<Rows>> {
        let logged = operations.clone();
        let responses = self.inner.exec(schema, operations).await?;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operations: logged,
                responses: responses.clone(),
            });

        Ok(responses)
    }
}
