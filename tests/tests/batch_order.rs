use keel::{stmt::Value, Db, Mutation, Row};
use pretty_assertions::assert_eq;
use tests::{blog, row, tests, DbTest};

async fn independent_updates_share_a_round_trip(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed(
            "users",
            [
                row([("id", Value::I64(1)), ("name", "a".into())]),
                row([("id", Value::I64(2)), ("name", "b".into())]),
            ],
        )
        .unwrap();

    let res = db
        .mutate(&Mutation::new().table(
            "users",
            [
                Row::update().set("id", 1).set("name", "x"),
                Row::update().set("id", 2).set("name", "y"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(res.batches().len(), 1);
    assert_eq!(
        test.log().round_trips(),
        [vec![
            "UPDATE users SET name = 'x' WHERE id = 1",
            "UPDATE users SET name = 'y' WHERE id = 2",
        ]]
    );
}

async fn freed_unique_value_is_reused(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed("users", [row([("id", Value::I64(1)), ("email", "a@b".into())])])
        .unwrap();

    // Listed first, the create still waits for the delete that frees its
    // email.
    db.mutate(&Mutation::new().table(
        "users",
        [
            Row::create().set("email", "a@b").set("name", "n"),
            Row::delete().set("id", 1).set("email", "a@b"),
        ],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [
            vec!["DELETE FROM users WHERE id = 1"],
            vec!["INSERT INTO users (email, name) VALUES ('a@b', 'n') RETURNING id"],
        ]
    );
    assert_eq!(
        test.memory().rows("users").unwrap(),
        [row([
            ("email", "a@b".into()),
            ("name", "n".into()),
            ("id", Value::I64(2))
        ])]
    );
}

async fn identified_by_unique_field(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed("users", [row([("id", Value::I64(4)), ("email", "a@b".into())])])
        .unwrap();

    db.mutate(&Mutation::new().table(
        "users",
        [Row::update()
            .set("email", "a@b")
            .set("name", "x")
            .identified_by(["email"])],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [vec!["UPDATE users SET name = 'x' WHERE email = 'a@b'"]]
    );
}

async fn update_returns_caller_placeholder(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed("users", [row([("id", Value::I64(4)), ("email", "a".into())])])
        .unwrap();

    let res = db
        .mutate(&Mutation::new().table(
            "users",
            [Row::update().set("email", "a").set("name", "n").guid("id", "me")],
        ))
        .await
        .unwrap();

    assert_eq!(res.value("me"), Some(&Value::I64(4)));
    assert_eq!(
        test.log().round_trips(),
        [vec![
            "UPDATE users SET name = 'n' WHERE email = 'a'",
            "SELECT email, id FROM users WHERE email = 'a'",
        ]]
    );
}

async fn plan_then_exec(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let plan = db
        .plan(&Mutation::new().table(
            "users",
            [Row::create()
                .set("name", "a")
                .child("posts", [Row::create().set("title", "t")])],
        ))
        .unwrap();

    assert_eq!(plan.batches().len(), 2);
    assert!(test.log().is_empty());

    let res = db.exec(plan).await.unwrap();

    assert_eq!(res.batches().len(), 2);
    assert_eq!(test.log().len(), 2);
    assert_eq!(test.log().writes(), 2);
}

tests!(
    independent_updates_share_a_round_trip,
    freed_unique_value_is_reused,
    identified_by_unique_field,
    update_returns_caller_placeholder,
    plan_then_exec,
);
