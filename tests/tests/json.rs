use keel::{stmt::Value, Db};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{blog, tests, DbTest};

async fn mutate_json_and_substitute(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    let mutation = json!({
        "users": [{
            "$operation": "create",
            "name": "a",
            "id": { "$guid": "author" },
            "posts": [
                { "$operation": "create", "title": "x", "user_id": { "$guid": "author" } },
                { "$operation": "create", "title": "y", "user_id": { "$guid": "author" } },
            ],
        }]
    });

    let res = db.mutate_json(&mutation).await.unwrap();

    assert_eq!(res.value("author"), Some(&Value::I64(1)));
    assert_eq!(
        res.substitute(&mutation),
        json!({
            "users": [{
                "$operation": "create",
                "name": "a",
                "id": 1,
                "posts": [
                    { "$operation": "create", "title": "x", "user_id": 1 },
                    { "$operation": "create", "title": "y", "user_id": 1 },
                ],
            }]
        })
    );

    // Placeholders the mutation never wrote are left alone
    let unknown = json!({ "ref": { "$guid": "nope" } });
    assert_eq!(res.substitute(&unknown), unknown);
}

async fn identifying_fields_keyword(test: &mut DbTest) {
    let db = test.setup_db(Db::builder().schema(blog()));

    test.memory()
        .seed(
            "users",
            [tests::row([("id", Value::I64(3)), ("email", "a@b".into())])],
        )
        .unwrap();

    db.mutate_json(&json!({
        "users": [{
            "$operation": "update",
            "$identifying_fields": ["email"],
            "email": "a@b",
            "name": "renamed",
        }]
    }))
    .await
    .unwrap();

    assert_eq!(
        test.log().round_trips(),
        [vec!["UPDATE users SET name = 'renamed' WHERE email = 'a@b'"]]
    );
}

tests!(
    mutate_json_and_substitute,
    identifying_fields_keyword,
);
