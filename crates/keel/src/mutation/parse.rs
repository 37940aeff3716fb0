use super::{FieldValue, GuidId, Mutation, Operation, Path, Row};
use keel_core::{stmt::Value, Error, Result};

use serde_json::{Map, Value as Json};

const OPERATION: &str = "$operation";
const IDENTIFYING_FIELDS: &str = "$identifying_fields";
const GUID: &str = "$guid";

impl Mutation {
    /// Parses the JSON form of a nested mutation.
    ///
    /// ```json
    /// { "users": [{ "$operation": "create", "name": "a",
    ///               "posts": [{ "$operation": "create", "title": "t" }] }] }
    /// ```
    ///
    /// Keys starting with `$` are keywords and never become columns. `$guid`
    /// objects are placeholders; arrays of objects are nested rows of the
    /// table named by their key.
    pub fn from_json(value: &Json) -> Result<Mutation> {
        let Json::Object(tables) = value else {
            return Err(Error::invalid_mutation(
                "a mutation must be an object keyed by table name",
            ));
        };

        let mut mutation = Mutation::new();

        for (table, rows) in tables {
            let rows = parse_rows(&Path::default(), table, rows)?;
            mutation = mutation.table(table.clone(), rows);
        }

        Ok(mutation)
    }
}

fn parse_rows(parent: &Path, table: &str, value: &Json) -> Result<Vec<Row>> {
    let Json::Array(items) = value else {
        return Err(Error::invalid_mutation(format!(
            "rows of `{table}` must be an array"
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = parent.child(table, index);
            match item {
                Json::Object(object) => parse_row(&path, object),
                _ => Err(Error::invalid_mutation(format!(
                    "{path} is not an object"
                ))),
            }
        })
        .collect()
}

fn parse_row(path: &Path, object: &Map<String, Json>) -> Result<Row> {
    let operation = match object.get(OPERATION) {
        Some(Json::String(name)) => Operation::parse(path, name)?,
        Some(other) => return Err(Error::unrecognized_operation(path, other.to_string())),
        None => {
            return Err(Error::invalid_mutation(format!(
                "{path} has no `{OPERATION}`"
            )))
        }
    };

    let mut row = Row::new(operation);

    if let Some(fields) = object.get(IDENTIFYING_FIELDS) {
        row.identifying_fields = Some(parse_identifying_fields(path, fields)?);
    }

    for (key, value) in object {
        if key.starts_with('$') {
            continue;
        }

        match value {
            Json::Array(_) => {
                let rows = parse_rows(path, key, value)?;
                row.children.entry(key.clone()).or_default().extend(rows);
            }
            Json::Object(object) => {
                let id = object
                    .get(GUID)
                    .and_then(GuidId::from_json)
                    .ok_or_else(|| {
                        Error::invalid_mutation(format!(
                            "{path}.{key} is an object but not a `{GUID}` placeholder"
                        ))
                    })?;
                row.fields.insert(key.clone(), FieldValue::Guid(id));
            }
            // Scalars always convert
            _ => {
                let value = Value::from_json(value).unwrap_or_default();
                row.fields.insert(key.clone(), FieldValue::Literal(value));
            }
        }
    }

    Ok(row)
}

fn parse_identifying_fields(path: &Path, value: &Json) -> Result<Vec<String>> {
    let invalid = || {
        Error::invalid_mutation(format!(
            "{path}: `{IDENTIFYING_FIELDS}` must be a non-empty array of field names"
        ))
    };

    let Json::Array(items) = value else {
        return Err(invalid());
    };

    if items.is_empty() {
        return Err(invalid());
    }

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}
