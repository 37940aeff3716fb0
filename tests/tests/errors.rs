use keel::{Db, Mutation, Row};
use keel_core::{
    async_trait,
    driver::{Driver, Operation, Rows},
    Schema,
};
use keel_driver_memory::Memory;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{blog, tests, DbTest};

use std::sync::Arc;

/// Drops the last response of every round trip.
#[derive(Debug, Default)]
struct Truncating(Memory);

#[async_trait]
impl Driver for Truncating {
    async fn exec(&self, schema: &Arc<Schema>, operations: Vec<Operation>) -> keel::Result<Vec<Rows>> {
        let mut responses = self.0.exec(schema, operations).await?;
        responses.pop();
        Ok(responses)
    }
}

async fn cycle_is_rejected_before_any_round_trip(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let err = db
        .mutate(&Mutation::new().table(
            "employees",
            [
                Row::create().set("id", 1).set("manager_id", 2),
                Row::create().set("id", 2).set("manager_id", 1),
            ],
        ))
        .await
        .unwrap_err();

    assert!(err.is_cycle_detected());
    assert_eq!(
        err.to_string(),
        "cycle detected between mutation pieces: employees[0], employees[1]"
    );
    assert!(test.log().is_empty());
}

async fn update_without_key_is_rejected(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let err = db
        .mutate(&Mutation::new().table("pages", [Row::update().set("views", 10)]))
        .await
        .unwrap_err();

    assert!(err.is_missing_identifying_key());
    assert!(test.log().is_empty());
}

async fn unknown_operation_is_rejected(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let err = db
        .mutate_json(&json!({
            "users": [{ "$operation": "merge", "name": "a" }]
        }))
        .await
        .unwrap_err();

    assert!(err.is_unrecognized_operation());
    assert_eq!(
        err.to_string(),
        "unrecognized operation `merge` at users[0]; expected one of create, update, delete, upsert"
    );
}

async fn short_response_is_rejected(test: &mut DbTest) {
    let db = test
        .try_setup_db_with(Db::builder().schema(blog()), Truncating::default())
        .unwrap();

    let err = db
        .mutate(&Mutation::new().table("users", [Row::create().set("name", "a")]))
        .await
        .unwrap_err();

    assert!(err.is_row_count_mismatch());
    assert_eq!(
        err.to_string(),
        "batch 0: row count mismatch: issued 1 statements, received 0 result sets"
    );
}

async fn later_batches_do_not_run_after_failure(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    // The post's author does not exist, so its comment is never inserted
    let err = db
        .mutate(&Mutation::new().table(
            "posts",
            [Row::create()
                .set("title", "t")
                .set("user_id", 99)
                .child("comments", [Row::create().set("body", "b")])],
        ))
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert_eq!(
        err.to_string(),
        "batch 0: posts.user_id = 99 references no row in users"
    );
    assert!(test.log().is_empty());
    assert!(test.memory().rows("comments").unwrap().is_empty());
}

async fn builder_requires_schema(test: &mut DbTest) {
    let err = test.try_setup_db(&mut Db::builder()).unwrap_err();

    assert!(err.is_invalid_schema());
}

tests!(
    cycle_is_rejected_before_any_round_trip,
    update_without_key_is_rejected,
    unknown_operation_is_rejected,
    short_response_is_rejected,
    later_batches_do_not_run_after_failure,
    builder_requires_schema,
);
