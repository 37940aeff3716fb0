mod db_test;
pub use db_test::DbTest;

mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

use keel::{stmt::Value, Schema};
use keel_core::driver;

/// Builds the runtime each generated test runs on.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime")
}

/// The schema the integration tests run against.
///
/// * `users(id)`, unique `email`
/// * `posts(id)`, unique `(slug, user_id)`, `posts.user_id -> users.id`
/// * `comments(id)`, `comments.post_id -> posts.id`
/// * `employees(id)`, `employees.manager_id -> employees.id`
/// * `pages(id)`
pub fn blog() -> Schema {
    Schema::builder()
        .table("users", ["id"])
        .unique("users", ["email"])
        .table("posts", ["id"])
        .unique("posts", ["slug", "user_id"])
        .edge("posts", "user_id", "users", "id")
        .table("comments", ["id"])
        .edge("comments", "post_id", "posts", "id")
        .table("employees", ["id"])
        .edge("employees", "manager_id", "employees", "id")
        .table("pages", ["id"])
        .build()
        .expect("blog schema is valid")
}

/// Builds a store row from `(column, value)` pairs.
pub fn row<const N: usize>(fields: [(&str, Value); N]) -> driver::Row {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Generates one `#[test]` per listed `async fn(&mut DbTest)`.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        mod memory {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new();
                    $crate::runtime().block_on(super::$f(&mut test));
                }
            )*
        }
    };
}
