mod classify;
mod exec;
mod flatten;
mod generate;

mod guids;
pub use guids::{GuidMap, GuidValues, GuidWrite};

mod identify;
mod infer;
mod matcher;

mod plan;
pub use plan::{Batch, Plan};

mod planner;

mod result;
pub use result::MutationResult;

mod toposort;


use crate::{mutation::Mutation, Options, Result};
use keel_core::{driver::Driver, Schema};

use std::sync::Arc;

/// Shared planning and execution state behind a `Db` handle.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    pub(crate) schema: Arc<Schema>,
    pub(crate) driver: Arc<dyn Driver>,
    pub(crate) options: Options,
}

impl Engine {
    pub(crate) fn plan(&self, mutation: &Mutation) -> Result<Plan> {
        planner::plan(&self.schema, &self.options, mutation)
    }

    pub(crate) async fn mutate(&self, mutation: &Mutation) -> Result<MutationResult> {
        let plan = self.plan(mutation)?;
        self.exec_plan(plan).await
    }
}
