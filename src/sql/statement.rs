//! `Statement`: one renderable SQL statement of any kind.

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;
use super::dml::{BulkInsertQuery, DeleteQuery, InsertQuery, UpdateQuery};
use super::query::{SelectQuery, SqlUnion};
use super::render;
use super::token::TokenStream;
use crate::error::Result;

/// Any statement the renderer understands. This is the unit read by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Select(SelectQuery),
    Union(SqlUnion),
    Insert(InsertQuery),
    BulkInsert(BulkInsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

impl Statement {
    /// Short statement kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Union(_) => "union",
            Statement::Insert(_) => "insert",
            Statement::BulkInsert(_) => "bulk_insert",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
        }
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_statement(self, dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        match self {
            Statement::Select(q) => q.to_tokens(dialect),
            Statement::Union(u) => u.to_tokens(dialect),
            Statement::Insert(i) => i.to_tokens(dialect),
            Statement::BulkInsert(b) => b.to_tokens(dialect),
            Statement::Update(u) => u.to_tokens(dialect),
            Statement::Delete(d) => d.to_tokens(dialect),
        }
    }
}

impl From<SelectQuery> for Statement {
    fn from(q: SelectQuery) -> Self {
        Statement::Select(q)
    }
}

impl From<SqlUnion> for Statement {
    fn from(u: SqlUnion) -> Self {
        Statement::Union(u)
    }
}

impl From<InsertQuery> for Statement {
    fn from(i: InsertQuery) -> Self {
        Statement::Insert(i)
    }
}

impl From<BulkInsertQuery> for Statement {
    fn from(b: BulkInsertQuery) -> Self {
        Statement::BulkInsert(b)
    }
}

impl From<UpdateQuery> for Statement {
    fn from(u: UpdateQuery) -> Self {
        Statement::Update(u)
    }
}

impl From<DeleteQuery> for Statement {
    fn from(d: DeleteQuery) -> Self {
        Statement::Delete(d)
    }
}
