use crate::{
    logging_driver::{DriverOp, LoggingDriver},
    ExecLog,
};
use keel::{db::Builder, Db};
use keel_core::Driver;
use keel_driver_memory::Memory;

use std::sync::{Arc, Mutex};

/// Per-test state: the memory store and the log of every round trip sent
/// to it.
pub struct DbTest {
    memory: Arc<Memory>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl DbTest {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        Self {
            memory: Arc::new(Memory::new()),
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builds a handle over the memory store, with logging.
    pub fn try_setup_db(&mut self, builder: &mut Builder) -> keel::Result<Db> {
        self.try_setup_db_with(builder, self.memory.clone())
    }

    /// Builds a handle over `driver`, with logging.
    pub fn try_setup_db_with(
        &mut self,
        builder: &mut Builder,
        driver: impl Driver,
    ) -> keel::Result<Db> {
        let logging_driver = LoggingDriver::new(Arc::new(driver));
        self.ops_log = logging_driver.ops_log_handle();

        builder.build(logging_driver)
    }

    pub fn setup_db(&mut self, builder: &mut Builder) -> Db {
        self.try_setup_db(builder).unwrap()
    }

    /// The store, for seeding rows and inspecting the outcome
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Get the execution log for assertions
    pub fn log(&mut self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }
}

impl Default for DbTest {
    fn default() -> Self {
        Self::new()
    }
}
