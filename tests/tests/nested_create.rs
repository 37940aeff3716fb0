use keel::{stmt::Value, Db, Mutation, Row};
use pretty_assertions::assert_eq;
use tests::{blog, row, tests, DbTest};

async fn create_user_with_posts(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let res = db
        .mutate(&Mutation::new().table(
            "users",
            [Row::create()
                .set("name", "a")
                .child("posts", [Row::create().set("title", "t")])],
        ))
        .await
        .unwrap();

    assert_eq!(res.batches().len(), 2);
    assert_eq!(
        test.log().round_trips(),
        [
            vec!["INSERT INTO users (name) VALUES ('a') RETURNING id"],
            vec!["INSERT INTO posts (title, user_id) VALUES ('t', 1) RETURNING id"],
        ]
    );

    assert_eq!(
        test.memory().rows("posts").unwrap(),
        [row([
            ("title", "t".into()),
            ("user_id", Value::I64(1)),
            ("id", Value::I64(1))
        ])]
    );
}

async fn create_three_levels(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let res = db
        .mutate(&Mutation::new().table(
            "users",
            [Row::create().set("name", "a").child(
                "posts",
                [Row::create()
                    .set("title", "t")
                    .child(
                        "comments",
                        [
                            Row::create().set("body", "first"),
                            Row::create().set("body", "second"),
                        ],
                    )],
            )],
        ))
        .await
        .unwrap();

    assert_eq!(res.batches().len(), 3);
    assert_eq!(
        test.log().round_trips()[2],
        ["INSERT INTO comments (body, post_id) VALUES ('first', 1), ('second', 1) RETURNING id"]
    );
    assert_eq!(test.memory().rows("comments").unwrap().len(), 2);
}

async fn siblings_share_a_round_trip(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    db.mutate(&Mutation::new().table(
        "users",
        [
            Row::create().set("name", "a").child("posts", [Row::create().set("title", "x")]),
            Row::create().set("name", "b").child("posts", [Row::create().set("title", "y")]),
        ],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [
            vec!["INSERT INTO users (name) VALUES ('a'), ('b') RETURNING id"],
            vec!["INSERT INTO posts (title, user_id) VALUES ('x', 1), ('y', 2) RETURNING id"],
        ]
    );
}

async fn explicit_guid_links_top_level_rows(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let res = db
        .mutate(
            &Mutation::new()
                .table("users", [Row::create().set("name", "a").guid("id", "author")])
                .table("posts", [Row::create().set("title", "t").guid("user_id", "author")]),
        )
        .await
        .unwrap();

    assert_eq!(res.value("author"), Some(&Value::I64(1)));
    assert_eq!(
        test.log().round_trips()[1],
        ["INSERT INTO posts (title, user_id) VALUES ('t', 1) RETURNING id"]
    );
}

async fn self_referencing_child_gets_manager(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    db.mutate(&Mutation::new().table(
        "employees",
        [Row::create()
            .set("name", "boss")
            .child("employees", [Row::create().set("name", "report")])],
    ))
    .await
    .unwrap();

    assert_eq!(
        test.memory().rows("employees").unwrap(),
        [
            row([("name", "boss".into()), ("id", Value::I64(1))]),
            row([
                ("name", "report".into()),
                ("manager_id", Value::I64(1)),
                ("id", Value::I64(2))
            ]),
        ]
    );
}

async fn update_waits_for_created_row(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory().seed("users", [row([("id", Value::I64(1))])]).unwrap();
    test.memory()
        .seed("posts", [row([("id", Value::I64(10)), ("user_id", Value::I64(1))])])
        .unwrap();

    // The update is listed first but still runs after the row it points at
    let res = db
        .mutate(
            &Mutation::new()
                .table("posts", [Row::update().set("id", 10).guid("user_id", "new")])
                .table("users", [Row::create().set("name", "n").guid("id", "new")]),
        )
        .await
        .unwrap();

    assert_eq!(res.value("new"), Some(&Value::I64(2)));
    assert_eq!(
        test.memory().rows("posts").unwrap(),
        [row([("id", Value::I64(10)), ("user_id", Value::I64(2))])]
    );
}

async fn placeholder_without_edge_reads_the_created_row(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    // `pages.owner` has no foreign key; only the shared placeholder orders it
    let res = db
        .mutate(
            &Mutation::new()
                .table("users", [Row::create().set("email", "a").guid("id", "owner")])
                .table(
                    "pages",
                    [Row::create()
                        .set("title", "first")
                        .child("pages", [Row::create().set("title", "second").guid("owner", "owner")])],
                ),
        )
        .await
        .unwrap();

    assert_eq!(res.value("owner"), Some(&Value::I64(1)));
    assert_eq!(res.batches().len(), 2);
    assert_eq!(
        test.memory().rows("pages").unwrap(),
        [
            row([("title", "first".into()), ("id", Value::I64(1))]),
            row([
                ("title", "second".into()),
                ("owner", Value::I64(1)),
                ("id", Value::I64(2))
            ]),
        ]
    );
}

tests!(
    create_user_with_posts,
    create_three_levels,
    siblings_share_a_round_trip,
    explicit_guid_links_top_level_rows,
    self_referencing_child_gets_manager,
    update_waits_for_created_row,
    placeholder_without_edge_reads_the_created_row,
);
