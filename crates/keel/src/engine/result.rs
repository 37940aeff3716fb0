use super::{Batch, GuidValues};
use crate::mutation::{GuidId, Piece, PieceId};
use keel_core::{driver, stmt::Value};

use index_vec::IndexVec;
use serde_json::Value as Json;

/// What a completed mutation did.
#[derive(Debug, Clone)]
pub struct MutationResult {
    pub(crate) pieces: IndexVec<PieceId, Piece>,
    pub(crate) batches: Vec<Batch>,
    pub(crate) guids: GuidValues,
    pub(crate) rows: IndexVec<PieceId, Option<driver::Row>>,
}

impl MutationResult {
    /// Pieces in execution order, with upserts resolved.
    pub fn pieces(&self) -> &IndexVec<PieceId, Piece> {
        &self.pieces
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Every placeholder value the store produced.
    pub fn guids(&self) -> &GuidValues {
        &self.guids
    }

    pub fn value(&self, guid: impl Into<GuidId>) -> Option<&Value> {
        self.guids.get(&guid.into())
    }

    /// The row the store returned for `id`, if it was inserted with returned
    /// columns or looked up.
    pub fn row(&self, id: PieceId) -> Option<&driver::Row> {
        self.rows.get(id).and_then(Option::as_ref)
    }

    /// Replaces every resolved `{"$guid": ..}` placeholder in `mutation`
    /// with its value. Unresolved placeholders are left in place.
    pub fn substitute(&self, mutation: &Json) -> Json {
        match mutation {
            Json::Object(object) => {
                if let Some(value) = object
                    .get("$guid")
                    .and_then(GuidId::from_json)
                    .and_then(|guid| self.guids.get(&guid))
                {
                    return value.to_json();
                }

                Json::Object(
                    object
                        .iter()
                        .map(|(key, value)| (key.clone(), self.substitute(value)))
                        .collect(),
                )
            }
            Json::Array(items) => Json::Array(items.iter().map(|item| self.substitute(item)).collect()),
            other => other.clone(),
        }
    }
}
