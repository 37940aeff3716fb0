use super::Db;
use crate::{engine::Engine, Options, Result};
use keel_core::{driver::Driver, Error, Schema};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    schema: Option<Schema>,
    options: Options,
}

impl Builder {
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// Replaces every option at once.
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn allow_ambiguous_identifying_key(&mut self, allow: bool) -> &mut Self {
        self.options.allow_ambiguous_identifying_key = allow;
        self
    }

    pub fn infer_guids(&mut self, infer: bool) -> &mut Self {
        self.options.infer_guids = infer;
        self
    }

    /// Builds the handle. The schema is moved out of the builder, so a second
    /// call needs a new one.
    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let Some(schema) = self.schema.take() else {
            return Err(Error::invalid_schema("no schema set on the builder"));
        };

        Ok(Db {
            engine: Engine {
                schema: Arc::new(schema),
                driver: Arc::new(driver),
                options: self.options.clone(),
            },
        })
    }
}
