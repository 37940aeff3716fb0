mod builder;
pub use builder::Builder;

use crate::{
    engine::{Engine, MutationResult, Plan},
    mutation::Mutation,
    Options, Result,
};
use keel_core::Schema;

use std::sync::Arc;

/// Handle for planning and running mutations against one schema and driver.
///
/// Cloning is cheap; clones share the schema and driver.
#[derive(Debug, Clone)]
pub struct Db {
    engine: Engine,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.engine.schema
    }

    pub fn options(&self) -> &Options {
        &self.engine.options
    }

    /// Plans `mutation` without running it.
    pub fn plan(&self, mutation: &Mutation) -> Result<Plan> {
        self.engine.plan(mutation)
    }

    /// Plans and runs `mutation`, one round trip per batch (two for batches
    /// holding upserts).
    ///
    /// The first error stops the mutation. Batches that already ran are not
    /// undone.
    pub async fn mutate(&self, mutation: &Mutation) -> Result<MutationResult> {
        self.engine.mutate(mutation).await
    }

    /// Parses the JSON form of a mutation, then runs it.
    pub async fn mutate_json(&self, mutation: &serde_json::Value) -> Result<MutationResult> {
        let mutation = Mutation::from_json(mutation)?;
        self.mutate(&mutation).await
    }

    /// Runs a plan produced by [`Db::plan`].
    pub async fn exec(&self, plan: Plan) -> Result<MutationResult> {
        self.engine.exec_plan(plan).await
    }
}
