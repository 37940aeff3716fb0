use super::index::FieldIndex;
use crate::mutation::{FieldValue, Operation, Piece, PieceId};
use keel_core::Schema;

use index_vec::IndexVec;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::trace;

/// Ordering constraints between pieces: `before => {after, ..}`.
#[derive(Debug, Default)]
pub(super) struct Graph {
    pub(super) edges: IndexMap<PieceId, IndexSet<PieceId>>,
}

struct Rules<'a> {
    schema: &'a Schema,
    pieces: &'a IndexVec<PieceId, Piece>,
    index: FieldIndex<'a>,
}

const WRITES: [Operation; 3] = [Operation::Create, Operation::Update, Operation::Upsert];

pub(super) fn build(schema: &Schema, pieces: &IndexVec<PieceId, Piece>) -> Graph {
    let rules = Rules {
        schema,
        pieces,
        index: FieldIndex::build(schema, pieces),
    };

    let mut graph = Graph {
        edges: pieces.indices().map(|id| (id, IndexSet::new())).collect(),
    };

    for (id, piece) in pieces.iter_enumerated() {
        match piece.operation {
            Operation::Create => {
                rules.precede_referencing_rows(id, &mut graph);
            }
            Operation::Update | Operation::Upsert => {
                rules.precede_referencing_rows(id, &mut graph);
                rules.free_abandoned_parent(id, &mut graph);
            }
            Operation::Delete => {
                rules.follow_child_deletes(id, &mut graph);
                rules.precede_value_reuse(id, &mut graph);
            }
        }
    }

    graph.order_shared_placeholders(pieces);

    graph
}

impl Graph {
    /// Orders the pieces sharing a placeholder so the piece that produces the
    /// value runs in an earlier batch than every piece reading it.
    ///
    /// The producer is the earliest occurrence no other occurrence is already
    /// ordered before. An update producer is left alone: its row exists
    /// before the batch runs and a read resolves through its identifying key.
    fn order_shared_placeholders(&mut self, pieces: &IndexVec<PieceId, Piece>) {
        let mut occurrences: IndexMap<_, IndexSet<PieceId>> = IndexMap::new();

        for (id, piece) in pieces.iter_enumerated() {
            for value in piece.record.values() {
                if let Some(guid) = value.guid() {
                    occurrences.entry(guid.clone()).or_default().insert(id);
                }
            }
        }

        for ids in occurrences.values().filter(|ids| ids.len() > 1) {
            let Some(&writer) = ids
                .iter()
                .find(|&&id| !ids.iter().any(|&other| other != id && self.reaches(other, id)))
            else {
                continue;
            };

            if pieces[writer].operation.is_update() {
                continue;
            }

            for &reader in ids {
                if reader != writer && !self.reaches(reader, writer) {
                    self.precede(pieces, writer, reader, "placeholder write first");
                }
            }
        }
    }

    /// Whether `to` is ordered after `from`, directly or through other pieces.
    fn reaches(&self, from: PieceId, to: PieceId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }

            let Some(after) = self.edges.get(&id) else {
                continue;
            };

            if after.contains(&to) {
                return true;
            }

            stack.extend(after.iter().copied());
        }

        false
    }

    fn precede(&mut self, pieces: &IndexVec<PieceId, Piece>, before: PieceId, after: PieceId, rule: &str) {
        if before == after {
            return;
        }

        if self.edges.entry(before).or_default().insert(after) {
            trace!(
                before = %pieces[before].path,
                after = %pieces[after].path,
                rule,
                "ordering edge"
            );
        }
    }
}

impl Rules<'_> {
    /// A row must exist before rows pointing at it are created, or updated to
    /// point at it.
    fn precede_referencing_rows(&self, id: PieceId, graph: &mut Graph) {
        let piece = &self.pieces[id];

        for edge in self.schema.child_edges(&piece.table) {
            // An update only matters when it moves the referenced value
            if piece.operation.is_update() && !self.changes(id, &edge.to_field) {
                continue;
            }

            let Some(key) = piece.get(&edge.to_field).and_then(FieldValue::index_key) else {
                continue;
            };

            for operation in WRITES {
                for &dependent in self.index.get(&edge.from_table, &edge.from_field, operation, &key) {
                    if operation.is_update() && !self.changes(dependent, &edge.from_field) {
                        continue;
                    }

                    graph.precede(self.pieces, id, dependent, "referenced row first");
                }
            }
        }
    }

    /// An update nested under a parent delete that points its foreign key
    /// elsewhere must run before the parent row goes away.
    fn free_abandoned_parent(&self, id: PieceId, graph: &mut Graph) {
        let piece = &self.pieces[id];

        let Some(parent_id) = piece.parent else {
            return;
        };
        let parent = &self.pieces[parent_id];

        if !parent.operation.is_delete() {
            return;
        }

        for edge in self.schema.parent_edges(&piece.table) {
            if edge.to_table != parent.table || !self.changes(id, &edge.from_field) {
                continue;
            }

            let new = piece.get(&edge.from_field).and_then(FieldValue::index_key);
            let old = parent.get(&edge.to_field).and_then(FieldValue::index_key);

            if old.is_none() || new != old {
                graph.precede(self.pieces, id, parent_id, "detach before parent delete");
            }
        }
    }

    /// Rows pointing at a deleted row are deleted first.
    fn follow_child_deletes(&self, id: PieceId, graph: &mut Graph) {
        let piece = &self.pieces[id];

        for edge in self.schema.child_edges(&piece.table) {
            let Some(key) = piece.get(&edge.to_field).and_then(FieldValue::index_key) else {
                continue;
            };

            for &child in self.index.get(&edge.from_table, &edge.from_field, Operation::Delete, &key) {
                graph.precede(self.pieces, child, id, "child delete first");
            }
        }
    }

    /// A delete frees its primary key and unique values; writes that take
    /// those values over run after it.
    fn precede_value_reuse(&self, id: PieceId, graph: &mut Graph) {
        let piece = &self.pieces[id];
        let groups = std::iter::once(self.schema.primary_key(&piece.table))
            .chain(self.schema.unique_groups(&piece.table).iter().map(|g| &g[..]));

        for group in groups {
            let Some(keys) = group
                .iter()
                .map(|field| {
                    piece
                        .get(field)
                        .filter(|value| value.is_literal())
                        .and_then(FieldValue::index_key)
                })
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };

            let (Some(first), Some(first_key)) = (group.first(), keys.first()) else {
                continue;
            };

            for operation in WRITES {
                for &other in self.index.get(&piece.table, first, operation, first_key) {
                    let other_piece = &self.pieces[other];

                    let same_values = group.iter().zip(&keys).all(|(field, key)| {
                        other_piece.get(field).and_then(FieldValue::index_key).as_ref() == Some(key)
                    });

                    if !same_values {
                        continue;
                    }

                    if operation.is_update() && !group.iter().any(|field| self.changes(other, field)) {
                        continue;
                    }

                    graph.precede(self.pieces, id, other, "free value before reuse");
                }
            }
        }
    }

    /// Whether an update writes a new value to `field` rather than using it to
    /// find the row.
    ///
    /// Explicit identifying fields never change. Neither does a primary key
    /// that is fully literal or a primary-key field holding a placeholder.
    fn changes(&self, id: PieceId, field: &str) -> bool {
        let piece = &self.pieces[id];

        let Some(value) = piece.get(field) else {
            return false;
        };

        if piece.is_explicitly_identified_by(field) {
            return false;
        }

        let primary_key = self.schema.primary_key(&piece.table);

        if primary_key.iter().any(|f| f == field) {
            if value.guid().is_some() {
                return false;
            }

            if primary_key
                .iter()
                .all(|f| piece.get(f).is_some_and(FieldValue::is_literal))
            {
                return false;
            }
        }

        true
    }
}
