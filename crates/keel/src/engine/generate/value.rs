use super::Generate;
use crate::{
    engine::identify,
    mutation::{FieldValue, GuidId, Piece, PieceId},
};
use keel_core::{
    err,
    stmt::{Expr, Query},
    Error, Result,
};

impl Generate<'_> {
    /// The value to write for `field`, or `None` when the store supplies it.
    ///
    /// Read placeholders whose value is not known yet become a scalar
    /// sub-select against the row that writes them.
    pub(super) fn value_expr(&self, piece: &Piece, field: &str) -> Result<Option<Expr>> {
        Ok(match piece.get(field) {
            Some(FieldValue::Literal(value)) => Some(Expr::Value(value.clone())),
            Some(FieldValue::Read(guid)) => Some(match self.values.get(guid) {
                Some(value) => Expr::Value(value.clone()),
                None => Expr::stmt(self.writer_query(guid, piece, field, 0)?),
            }),
            Some(FieldValue::Write(_) | FieldValue::Guid(_)) | None => None,
        })
    }

    /// `key1 = v1 AND key2 = v2 ...` over the identifying fields of `id`.
    pub(super) fn identifying_filter(&self, id: PieceId) -> Result<Expr> {
        self.filter_at(id, 0)
    }

    fn filter_at(&self, id: PieceId, depth: usize) -> Result<Expr> {
        let piece = &self.plan.pieces[id];
        let key = identify::require_identifying_key(self.schema, piece, self.allow_ambiguous)?;

        let clauses = key
            .iter()
            .map(|field| self.field_clause(piece, field, depth))
            .collect::<Result<Vec<_>>>()?;

        Ok(Expr::and_from_iter(clauses))
    }

    fn field_clause(&self, piece: &Piece, field: &str, depth: usize) -> Result<Expr> {
        match piece.get(field) {
            Some(FieldValue::Literal(value)) => Ok(Expr::eq(Expr::column(field), value.clone())),
            Some(FieldValue::Read(guid)) => match self.values.get(guid) {
                Some(value) => Ok(Expr::eq(Expr::column(field), value.clone())),
                None => Ok(Expr::in_subquery(
                    Expr::column(field),
                    self.writer_query(guid, piece, field, depth)?,
                )),
            },
            _ => Err(err!("{}.{field} cannot identify a row", piece.path)),
        }
    }

    /// `SELECT field FROM writer WHERE <writer identifying filter>` for the
    /// piece that writes `guid`.
    fn writer_query(&self, guid: &GuidId, reader: &Piece, field: &str, depth: usize) -> Result<Query> {
        let unresolvable = || Error::unresolvable_guid(guid, format!("{}.{field}", reader.table));

        let Some(write) = self.plan.guids.writer(guid) else {
            return Err(unresolvable());
        };

        let writer = &self.plan.pieces[write.piece];

        // A chain longer than the plan loops back on itself
        if depth > self.plan.pieces.len()
            || identify::identifying_key(self.schema, writer, self.allow_ambiguous).is_empty()
        {
            return Err(unresolvable());
        }

        let filter = self.filter_at(write.piece, depth + 1)?;

        Ok(Query::new(
            writer.table.clone(),
            vec![write.field.clone()],
            filter,
        ))
    }
}
