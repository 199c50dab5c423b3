//! Render entry points.
//!
//! Each function validates its statement, renders it for the requested
//! dialect and returns the SQL text. Rendering never mutates the input.

use super::dialect::{Dialect, PagingStrategy, SqlDialect};
use super::dml::{BulkInsertQuery, DeleteQuery, InsertQuery, UpdateQuery};
use super::paging::row_number_rewrite;
use super::query::{SelectQuery, SqlUnion};
use super::statement::Statement;
use super::token::TokenStream;
use crate::error::Result;
use crate::validation::Validate;

fn finish(kind: &str, dialect: Dialect, tokens: TokenStream) -> String {
    let sql = tokens.serialize(dialect);
    tracing::debug!(dialect = %dialect, kind, len = sql.len(), "rendered statement");
    sql
}

/// Render a SELECT. Paged queries are rewritten on ROW_NUMBER dialects.
pub fn render_select(query: &SelectQuery, dialect: Dialect) -> Result<String> {
    query.validate()?;
    Ok(finish("select", dialect, query.to_tokens(dialect)?))
}

/// Render the companion `SELECT COUNT(*)` for `query`.
pub fn render_row_count(query: &SelectQuery, dialect: Dialect) -> Result<String> {
    query.validate()?;
    let count = query.row_count();
    Ok(finish("row_count", dialect, count.to_tokens(dialect)?))
}

/// The statement `dialect` will actually run for a paged query.
///
/// ROW_NUMBER dialects get the nested rewrite; LIMIT/OFFSET dialects get an
/// unchanged clone, as paging is appended at render time.
pub fn paging(query: &SelectQuery, dialect: Dialect) -> Result<SelectQuery> {
    query.validate()?;
    match dialect.paging_strategy() {
        PagingStrategy::RowNumberWrapper => row_number_rewrite(query),
        PagingStrategy::LimitOffset => Ok(query.clone()),
    }
}

pub fn render_union(union: &SqlUnion, dialect: Dialect) -> Result<String> {
    union.validate()?;
    Ok(finish("union", dialect, union.to_tokens(dialect)?))
}

pub fn render_insert(insert: &InsertQuery, dialect: Dialect) -> Result<String> {
    insert.validate()?;
    Ok(finish("insert", dialect, insert.to_tokens(dialect)?))
}

pub fn render_bulk_insert(bulk: &BulkInsertQuery, dialect: Dialect) -> Result<String> {
    bulk.validate()?;
    Ok(finish("bulk_insert", dialect, bulk.to_tokens(dialect)?))
}

pub fn render_update(update: &UpdateQuery, dialect: Dialect) -> Result<String> {
    update.validate()?;
    Ok(finish("update", dialect, update.to_tokens(dialect)?))
}

pub fn render_delete(delete: &DeleteQuery, dialect: Dialect) -> Result<String> {
    delete.validate()?;
    Ok(finish("delete", dialect, delete.to_tokens(dialect)?))
}

/// Render any statement.
pub fn render_statement(statement: &Statement, dialect: Dialect) -> Result<String> {
    statement.validate()?;
    Ok(finish(statement.kind(), dialect, statement.to_tokens(dialect)?))
}
