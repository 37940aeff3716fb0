use crate::mutation::{FieldValue, Piece};
use keel_core::{Error, Result, Schema};

/// Chooses the fields that locate `piece`'s existing row.
///
/// Caller-supplied `$identifying_fields` win. Otherwise the primary key is
/// used when every field of it is concrete. Failing that, the unique groups
/// whose fields are all concrete are eligible: with `allow_ambiguous` the
/// shortest wins (earliest declared on ties), without it there must be
/// exactly one. An empty result means the row cannot be searched for yet.
pub(crate) fn identifying_key(schema: &Schema, piece: &Piece, allow_ambiguous: bool) -> Vec<String> {
    if let Some(fields) = &piece.identifying_fields {
        return if usable(piece, fields) {
            fields.clone()
        } else {
            vec![]
        };
    }

    let primary_key = schema.primary_key(&piece.table);

    if !primary_key.is_empty() && usable(piece, primary_key) {
        return primary_key.to_vec();
    }

    let Some(table) = schema.table(&piece.table) else {
        return vec![];
    };

    let mut eligible = table
        .unique
        .iter()
        .filter(|group| !table.is_primary_key(group) && usable(piece, group));

    if allow_ambiguous {
        return eligible
            .min_by_key(|group| group.len())
            .cloned()
            .unwrap_or_default();
    }

    match (eligible.next(), eligible.next()) {
        (Some(group), None) => group.clone(),
        _ => vec![],
    }
}

fn usable(piece: &Piece, fields: &[String]) -> bool {
    fields
        .iter()
        .all(|field| piece.get(field).is_some_and(FieldValue::is_concrete))
}

/// Like [`identifying_key`], but an empty result is a
/// missing-identifying-key error naming every rejected candidate.
pub(crate) fn require_identifying_key(
    schema: &Schema,
    piece: &Piece,
    allow_ambiguous: bool,
) -> Result<Vec<String>> {
    let key = identifying_key(schema, piece, allow_ambiguous);

    if !key.is_empty() {
        return Ok(key);
    }

    let candidates = match &piece.identifying_fields {
        Some(fields) => vec![fields.clone()],
        None => std::iter::once(schema.primary_key(&piece.table).to_vec())
            .chain(schema.unique_groups(&piece.table).iter().cloned())
            .collect(),
    };

    Err(Error::missing_identifying_key(&piece.path, candidates))
}
