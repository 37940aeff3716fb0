mod assignments;
pub use assignments::Assignments;

mod delete;
pub use delete::Delete;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_in_subquery;
pub use expr_in_subquery::ExprInSubquery;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_stmt;
pub use expr_stmt::ExprStmt;

mod insert;
pub use insert::Insert;

mod op_binary;
pub use op_binary::BinaryOp;

mod query;
pub use query::Query;

mod statement;
pub use statement::Statement;

mod update;
pub use update::Update;

mod value;
pub use value::Value;
