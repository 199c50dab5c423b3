//! SQL generation module.
//!
//! This module provides the statement model and a multi-dialect renderer.
//! It includes:
//!
//! - [`value`] - Typed constants
//! - [`expr`] - Expression AST and builder DSL
//! - [`predicate`] - WHERE/HAVING predicate trees
//! - [`from`] - FROM sources and joins
//! - [`query`] - SELECT and UNION
//! - [`dml`] - INSERT, bulk INSERT, UPDATE, DELETE
//! - [`statement`] - Sum type over every statement
//! - [`paging`] - ROW_NUMBER() paging rewrite
//! - [`render`] - Validating render entry points
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod dml;
pub mod expr;
pub mod from;
pub mod paging;
pub mod predicate;
pub mod query;
pub mod render;
pub mod statement;
pub mod token;
pub mod value;


// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use dml::{BulkInsertQuery, DeleteQuery, InsertQuery, UpdateQuery, UpdateTerm};
pub use expr::{
    avg, case_when, col, count, count_distinct, count_star, date_diff, func, grouping, if_null,
    lit, lit_bool, lit_float, lit_int, lit_str, max, min, null, param, raw_sql, star, sum,
    table_col, table_star, AggregateFunction, ArithmeticOp, DateUnit, Expr, ExprExt,
};
pub use from::{FromClause, FromSource, FromTerm, Join, JoinCondition, JoinType};
pub use predicate::{CompareOp, Relationship, SubQuery, WhereClause, WhereTerm};
pub use query::{
    GroupByTerm, GroupModifier, OrderByTerm, Paging, SelectColumn, SelectQuery, SortDirection,
    SqlUnion, UnionModifier,
};
pub use statement::Statement;
pub use token::{Token, TokenStream};
pub use value::{Constant, DataKind, Number};
