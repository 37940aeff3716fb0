pub mod db;
pub use db::Db;

mod engine;
pub use engine::{Batch, GuidMap, GuidValues, GuidWrite, MutationResult, Plan};

pub mod mutation;
pub use mutation::{FieldValue, GuidId, Mutation, Operation, Path, Piece, PieceId, Row};

mod options;
pub use options::Options;

pub use keel_core::{driver, schema, stmt, Error, Result, Schema};
