use keel::{stmt::Value, Db, Mutation, Operation, PieceId, Row};
use pretty_assertions::assert_eq;
use tests::{blog, row, tests, DbTest};

fn upsert(name: &str) -> Mutation {
    Mutation::new().table("users", [Row::upsert().set("email", "a@b").set("name", name)])
}

async fn upsert_creates_missing_row(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let res = db.mutate(&upsert("new")).await.unwrap();

    assert_eq!(res.pieces()[PieceId::new(0)].operation, Operation::Create);
    assert_eq!(test.log().probes(), 1);
    assert_eq!(
        test.log().round_trips(),
        [
            vec!["SELECT email FROM users WHERE email = 'a@b'"],
            vec!["INSERT INTO users (email, name) VALUES ('a@b', 'new') RETURNING id"],
        ]
    );
}

async fn upsert_updates_existing_row(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed(
            "users",
            [row([
                ("id", Value::I64(5)),
                ("email", "a@b".into()),
                ("name", "old".into()),
            ])],
        )
        .unwrap();

    let res = db.mutate(&upsert("new")).await.unwrap();

    assert_eq!(res.pieces()[PieceId::new(0)].operation, Operation::Update);
    assert_eq!(
        test.log().round_trips()[1],
        ["UPDATE users SET name = 'new' WHERE email = 'a@b'"]
    );
    assert_eq!(
        test.memory().rows("users").unwrap(),
        [row([
            ("id", Value::I64(5)),
            ("email", "a@b".into()),
            ("name", "new".into()),
        ])]
    );
}

async fn upsert_twice_is_idempotent(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    db.mutate(&upsert("a")).await.unwrap();
    db.mutate(&upsert("b")).await.unwrap();

    assert_eq!(
        test.memory().rows("users").unwrap(),
        [row([
            ("email", "a@b".into()),
            ("name", "b".into()),
            ("id", Value::I64(1)),
        ])]
    );
}

async fn upserted_parent_id_reaches_child(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed("users", [row([("id", Value::I64(5)), ("email", "a@b".into())])])
        .unwrap();

    let res = db
        .mutate(&Mutation::new().table(
            "users",
            [Row::upsert().set("email", "a@b").guid("id", "u").child(
                "posts",
                [Row::create().set("title", "t").guid("user_id", "u")],
            )],
        ))
        .await
        .unwrap();

    assert_eq!(res.value("u"), Some(&Value::I64(5)));
    assert_eq!(
        test.log().round_trips(),
        [
            vec!["SELECT email FROM users WHERE email = 'a@b'"],
            vec!["SELECT email, id FROM users WHERE email = 'a@b'"],
            vec!["INSERT INTO posts (title, user_id) VALUES ('t', 5) RETURNING id"],
        ]
    );
}

tests!(
    upsert_creates_missing_row,
    upsert_updates_existing_row,
    upsert_twice_is_idempotent,
    upserted_parent_id_reaches_child,
);
