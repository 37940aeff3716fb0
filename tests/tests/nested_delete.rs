use keel::{stmt::Value, Db, Mutation, Row};
use pretty_assertions::assert_eq;
use tests::{blog, row, tests, DbTest};

fn seed(test: &DbTest) {
    test.memory()
        .seed("users", [row([("id", Value::I64(1)), ("email", "a@b".into())])])
        .unwrap();
    test.memory()
        .seed("posts", [row([("id", Value::I64(10)), ("user_id", Value::I64(1))])])
        .unwrap();
}

async fn delete_children_before_parent(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));
    seed(test);

    db.mutate(&Mutation::new().table(
        "users",
        [Row::delete()
            .set("id", 1)
            .child("posts", [Row::delete().set("id", 10)])],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [
            vec!["DELETE FROM posts WHERE id = 10"],
            vec!["DELETE FROM users WHERE id = 1"],
        ]
    );
    assert!(test.memory().rows("users").unwrap().is_empty());
    assert!(test.memory().rows("posts").unwrap().is_empty());
}

async fn parent_id_read_from_deleted_child(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));
    seed(test);

    // The user is only known by email. Its id is read off the post while
    // the post still exists.
    db.mutate(&Mutation::new().table(
        "users",
        [Row::delete()
            .set("email", "a@b")
            .child("posts", [Row::delete().set("id", 10)])],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [
            vec![
                "SELECT id, user_id FROM posts WHERE id = 10",
                "DELETE FROM posts WHERE id = 10",
            ],
            vec!["DELETE FROM users WHERE id = 1"],
        ]
    );
    assert!(test.memory().rows("users").unwrap().is_empty());
}

async fn detach_child_before_deleting_parent(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));
    seed(test);
    test.memory().seed("users", [row([("id", Value::I64(2))])]).unwrap();

    db.mutate(&Mutation::new().table(
        "users",
        [Row::delete()
            .set("id", 1)
            .child("posts", [Row::update().set("id", 10).set("user_id", 2)])],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [
            vec!["UPDATE posts SET user_id = 2 WHERE id = 10"],
            vec!["DELETE FROM users WHERE id = 1"],
        ]
    );
    assert_eq!(
        test.memory().rows("posts").unwrap(),
        [row([("id", Value::I64(10)), ("user_id", Value::I64(2))])]
    );
}

async fn deleting_a_referenced_row_fails(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));
    seed(test);

    let err = db
        .mutate(&Mutation::new().table("users", [Row::delete().set("id", 1)]))
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert_eq!(
        err.to_string(),
        "batch 0: posts.user_id = 1 references no row in users"
    );
    assert_eq!(test.memory().rows("users").unwrap().len(), 1);
}

tests!(
    delete_children_before_parent,
    parent_id_read_from_deleted_child,
    detach_child_before_deleting_parent,
    deleting_a_referenced_row_fails,
);
