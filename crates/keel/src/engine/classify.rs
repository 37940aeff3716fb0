use super::GuidMap;
use crate::mutation::{FieldValue, Piece, PieceId};

use index_vec::IndexVec;

/// Marks the first occurrence of every placeholder, in piece order, as its
/// write and all later occurrences as reads.
///
/// Must run on the final piece order. Running it again yields the same
/// result.
pub(crate) fn classify(pieces: &mut IndexVec<PieceId, Piece>) -> GuidMap {
    let mut guids = GuidMap::default();

    for (id, piece) in pieces.iter_mut_enumerated() {
        for (field, value) in piece.record.iter_mut() {
            let Some(guid) = value.guid().cloned() else {
                continue;
            };

            *value = if guids.record(&guid, id, field) {
                FieldValue::Write(guid)
            } else {
                FieldValue::Read(guid)
            };
        }
    }

    guids
}
