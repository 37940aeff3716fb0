mod graph;
mod index;

use super::{classify, flatten, identify, infer, toposort, Batch, Plan};
use crate::{
    mutation::{Mutation, Piece, PieceId},
    Options,
};
use keel_core::{Error, Result, Schema};

use index_vec::IndexVec;
use tracing::debug;

/// Plans a mutation: flattens it, fills in placeholders, orders the pieces
/// into batches and classifies every placeholder occurrence.
///
/// Fails before anything runs when the pieces cannot be ordered or an
/// update, delete or upsert has no way to find its row.
pub(crate) fn plan(schema: &Schema, options: &Options, mutation: &Mutation) -> Result<Plan> {
    let mut pieces = flatten::flatten(schema, mutation)?;
    infer::infer(schema, &mut pieces, options);

    let graph = graph::build(schema, &pieces);

    let tiers = toposort::toposort(&graph.edges).map_err(|cycle| {
        Error::cycle_detected(cycle.nodes.iter().map(|id| &pieces[*id].path))
    })?;

    let (mut pieces, batches) = reorder(pieces, tiers);
    let guids = classify::classify(&mut pieces);

    for piece in pieces.iter() {
        if piece.operation.targets_existing_row() {
            identify::require_identifying_key(
                schema,
                piece,
                options.allow_ambiguous_identifying_key,
            )?;
        }
    }

    debug!(
        pieces = pieces.len(),
        batches = batches.len(),
        guids = guids.len(),
        "planned mutation"
    );

    Ok(Plan {
        pieces,
        batches,
        guids,
    })
}

/// Lays pieces out tier by tier and rewrites parent and child links to the
/// new positions.
fn reorder(
    pieces: IndexVec<PieceId, Piece>,
    tiers: Vec<Vec<PieceId>>,
) -> (IndexVec<PieceId, Piece>, Vec<Batch>) {
    let mut position = IndexVec::from_vec(vec![PieceId::new(0); pieces.len()]);
    let mut batches = Vec::with_capacity(tiers.len());
    let mut start = 0;

    for tier in &tiers {
        for (offset, id) in tier.iter().enumerate() {
            position[*id] = PieceId::new(start + offset);
        }

        batches.push(Batch {
            start,
            end: start + tier.len(),
        });
        start += tier.len();
    }

    let mut reordered: Vec<(PieceId, Piece)> = pieces
        .into_iter_enumerated()
        .map(|(id, mut piece)| {
            piece.parent = piece.parent.map(|parent| position[parent]);
            for child in &mut piece.children {
                *child = position[*child];
            }
            (position[id], piece)
        })
        .collect();

    reordered.sort_by_key(|(id, _)| *id);

    (
        reordered.into_iter().map(|(_, piece)| piece).collect(),
        batches,
    )
}
