use super::GuidMap;
use crate::mutation::{FieldValue, GuidId, Piece, PieceId};

use index_vec::IndexVec;
use std::{collections::HashSet, ops::Range};

/// Ordered pieces of a mutation, split into batches.
///
/// Every batch only depends on earlier ones. Placeholders are already
/// classified: the first occurrence of each guid, in piece order, writes it.
#[derive(Debug, Clone)]
pub struct Plan {
    pub(crate) pieces: IndexVec<PieceId, Piece>,
    pub(crate) batches: Vec<Batch>,
    pub(crate) guids: GuidMap,
}

/// A contiguous range of planned pieces, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: usize,
    pub end: usize,
}

impl Plan {
    pub fn pieces(&self) -> &IndexVec<PieceId, Piece> {
        &self.pieces
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn guids(&self) -> &GuidMap {
        &self.guids
    }

    pub fn batch_pieces(&self, batch: Batch) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        batch.ids().map(move |id| (id, &self.pieces[id]))
    }

    /// Placeholders read by at least one piece.
    pub(crate) fn read_guids(&self) -> HashSet<GuidId> {
        self.pieces
            .iter()
            .flat_map(|piece| piece.record.values())
            .filter_map(|value| match value {
                FieldValue::Read(guid) => Some(guid.clone()),
                _ => None,
            })
            .collect()
    }

    /// Index of the batch containing `id`.
    pub fn batch_of(&self, id: PieceId) -> Option<usize> {
        self.batches.iter().position(|batch| batch.contains(id))
    }
}

impl Batch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.range().contains(&id.index())
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn ids(&self) -> impl Iterator<Item = PieceId> {
        self.range().map(PieceId::from_usize)
    }
}
