use super::{blog, plan};
use crate::engine::{generate::Generate, GuidValues, Plan};
use crate::mutation::{FieldValue, GuidId, Mutation, PieceId, Row};
use keel_core::stmt::Value;
use pretty_assertions::assert_eq;

fn statements(plan: &Plan, values: &GuidValues, batch: usize) -> keel_core::Result<Vec<String>> {
    let schema = blog();
    let pending = plan.read_guids();

    let operations = Generate::new(&schema, plan, values, &pending, false)
        .batch(plan.batches()[batch])?;

    Ok(operations.iter().map(|op| op.stmt.to_string()).collect())
}

fn written_guid(plan: &Plan, id: usize, field: &str) -> GuidId {
    match plan.pieces()[PieceId::new(id)].get(field) {
        Some(FieldValue::Write(guid)) => guid.clone(),
        other => panic!("expected a write placeholder; got {other:?}"),
    }
}

#[test]
fn nested_create_uses_returned_parent_key() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::create()
            .set("name", "a")
            .child("posts", [Row::create().set("title", "t")])],
    ))
    .unwrap();

    let mut values = GuidValues::default();

    assert_eq!(
        statements(&plan, &values, 0).unwrap(),
        ["INSERT INTO users (name) VALUES ('a') RETURNING id"]
    );

    values.insert(written_guid(&plan, 0, "id"), Value::I64(7));

    assert_eq!(
        statements(&plan, &values, 1).unwrap(),
        ["INSERT INTO posts (title, user_id) VALUES ('t', 7) RETURNING id"]
    );
}

#[test]
fn unknown_read_becomes_sub_select() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::create()
            .set("email", "a@b")
            .child("posts", [Row::create().set("title", "t")])],
    ))
    .unwrap();

    assert_eq!(
        statements(&plan, &GuidValues::default(), 1).unwrap(),
        ["INSERT INTO posts (title, user_id) VALUES ('t', (SELECT id FROM users WHERE email = 'a@b')) RETURNING id"]
    );
}

#[test]
fn unknown_read_of_unidentifiable_writer_fails() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::create()
            .set("name", "a")
            .child("posts", [Row::create().set("title", "t")])],
    ))
    .unwrap();

    let err = statements(&plan, &GuidValues::default(), 1).unwrap_err();
    assert!(err.is_unresolvable_guid(), "{err}");
    assert!(err.to_string().contains("posts.user_id"), "{err}");
}

#[test]
fn multi_row_insert_fills_missing_columns_with_null() {
    let plan = plan(Mutation::new().table(
        "users",
        [
            Row::create().set("name", "a"),
            Row::create().set("id", 5).set("email", "b@c"),
        ],
    ))
    .unwrap();

    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        ["INSERT INTO users (name, id, email) VALUES ('a', NULL, NULL), (NULL, 5, 'b@c') RETURNING id"]
    );
}

#[test]
fn update_assigns_everything_but_the_key() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::update()
            .set("id", 1)
            .set("name", "x")
            .set("email", "e@f")],
    ))
    .unwrap();

    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        ["UPDATE users SET name = 'x', email = 'e@f' WHERE id = 1"]
    );
}

#[test]
fn stub_update_issues_nothing() {
    let plan = plan(Mutation::new().table("users", [Row::update().set("id", 1)])).unwrap();

    assert!(statements(&plan, &GuidValues::default(), 0).unwrap().is_empty());
}

#[test]
fn deletes_of_a_table_share_one_statement() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::delete().set("id", 1), Row::delete().set("id", 2)],
    ))
    .unwrap();

    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        ["DELETE FROM users WHERE id = 1 OR id = 2"]
    );
}

#[test]
fn deleted_rows_are_looked_up_before_the_delete() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::delete()
            .set("email", "a@b")
            .child("posts", [Row::delete().set("id", 10)])],
    ))
    .unwrap();

    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        [
            "SELECT id, user_id FROM posts WHERE id = 10",
            "DELETE FROM posts WHERE id = 10",
        ]
    );

    // The parent is found through the child's foreign key
    assert_eq!(
        statements(&plan, &GuidValues::default(), 1).unwrap(),
        ["DELETE FROM users WHERE id IN (SELECT user_id FROM posts WHERE id = 10)"]
    );

    let mut values = GuidValues::default();
    values.insert(written_guid(&plan, 0, "user_id"), Value::I64(1));

    assert_eq!(
        statements(&plan, &values, 1).unwrap(),
        ["DELETE FROM users WHERE id = 1"]
    );
}

#[test]
fn updated_rows_are_looked_up_after_the_writes() {
    let plan = plan(
        Mutation::new()
            .table(
                "users",
                [Row::update()
                    .set("email", "a@b")
                    .guid("id", 1)
                    .set("name", "n")],
            )
            .table(
                "posts",
                [Row::create().guid("user_id", 1).set("title", "t")],
            ),
    )
    .unwrap();

    assert_eq!(plan.batches().len(), 1);

    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        [
            "UPDATE users SET name = 'n' WHERE email = 'a@b'",
            "INSERT INTO posts (user_id, title) VALUES ((SELECT id FROM users WHERE email = 'a@b'), 't') RETURNING id",
            "SELECT email, id FROM users WHERE email = 'a@b'",
        ]
    );
}

#[test]
fn caller_placeholders_are_looked_up_without_readers() {
    let plan = plan(Mutation::new().table(
        "users",
        [Row::update()
            .set("email", "a@b")
            .guid("id", "me")
            .set("name", "n")],
    ))
    .unwrap();

    assert!(plan.read_guids().is_empty());
    assert_eq!(
        statements(&plan, &GuidValues::default(), 0).unwrap(),
        [
            "UPDATE users SET name = 'n' WHERE email = 'a@b'",
            "SELECT email, id FROM users WHERE email = 'a@b'",
        ]
    );
}

#[test]
fn upserts_probe_by_identifying_key() {
    let plan = plan(Mutation::new().table(
        "users",
        [
            Row::upsert().set("email", "a@b").set("name", "a"),
            Row::upsert().set("email", "c@d").set("name", "c"),
        ],
    ))
    .unwrap();

    let schema = blog();
    let pending = plan.read_guids();
    let values = GuidValues::default();
    let generate = Generate::new(&schema, &plan, &values, &pending, false);

    let probes: Vec<_> = generate
        .probes(plan.batches()[0])
        .unwrap()
        .iter()
        .map(|op| op.stmt.to_string())
        .collect();

    assert_eq!(
        probes,
        ["SELECT email FROM users WHERE email = 'a@b' OR email = 'c@d'"]
    );

    // Upserts must be resolved before their batch is generated
    assert!(generate.batch(plan.batches()[0]).is_err());
}
