mod operation;
pub use operation::{Operation, Purpose};

mod response;
pub use response::{Row, Rows};

use crate::{async_trait, Schema};

use std::{fmt::Debug, sync::Arc};

/// The execution collaborator.
///
/// A driver receives every statement of one round trip at once and returns
/// one [`Rows`] per operation, in the same order. The engine awaits the round
/// trip before planning the next batch and never issues two round trips
/// concurrently.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute one round trip
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> crate::Result<Vec<Rows>>;
}

#[async_trait]
impl<T: Driver + ?Sized> Driver for Arc<T> {
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> crate::Result<Vec<Rows>> {
        (**self).exec(schema, operations).await
    }
}

#[async_trait]
impl<T: Driver + ?Sized> Driver for Box<T> {
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> crate::Result<Vec<Rows>> {
        (**self).exec(schema, operations).await
    }
}
