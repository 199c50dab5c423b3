//! # sqlom
//!
//! A SQL query object model that renders to multiple dialects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Statement model (SELECT, UNION, DML)              │
//! │   built in code, from mappings, pivots, or JSON          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Structural checks (first failure wins)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [paging rewrite, if needed]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 TokenStream                              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect serialization]
//! ┌─────────────────────────────────────────────────────────┐
//! │      SQL text: SQL Server, Oracle, MySQL, Postgres       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sqlom::prelude::*;
//!
//! let query = SelectQuery::new()
//!     .from(FromTerm::table("customers"))
//!     .column(col("name"))
//!     .filter(col("name").eq("John"));
//!
//! assert_eq!(
//!     query.to_sql(Dialect::MySql).unwrap(),
//!     "SELECT `name` FROM `customers` WHERE `name` = 'John'"
//! );
//! ```

pub mod config;
pub mod error;
pub mod mapping;
pub mod pivot;
pub mod sql;
pub mod validation;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::mapping::{AliasSession, MappingRegistry, TableMapping};
    pub use crate::pivot::{PivotColumn, PivotTable};
    pub use crate::sql::dialect::{Dialect, SqlDialect};
    pub use crate::sql::dml::{BulkInsertQuery, DeleteQuery, InsertQuery, UpdateQuery};
    pub use crate::sql::expr::{
        // Constructors
        avg,
        case_when,
        col,
        count,
        count_distinct,
        count_star,
        date_diff,
        func,
        grouping,
        if_null,
        lit,
        max,
        min,
        null,
        param,
        raw_sql,
        star,
        sum,
        table_col,
        table_star,
        // Types
        AggregateFunction,
        DateUnit,
        Expr,
        ExprExt,
    };
    pub use crate::sql::from::{FromTerm, Join, JoinType};
    pub use crate::sql::predicate::{WhereClause, WhereTerm};
    pub use crate::sql::query::{
        GroupByTerm, OrderByTerm, SelectColumn, SelectQuery, SortDirection, SqlUnion,
    };
    pub use crate::sql::statement::Statement;
    pub use crate::sql::value::{Constant, DataKind};
    pub use crate::validation::Validate;
}

// Also export at crate root for convenience
pub use error::{Error, Result};
pub use sql::dialect::Dialect;
pub use sql::statement::Statement;
pub use validation::{Validate, ValidationError};
