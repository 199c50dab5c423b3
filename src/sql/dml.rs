//! DML statements: INSERT, bulk INSERT, UPDATE, DELETE.
//!
//! # Examples
//!
//! ```ignore
//! use sqlom::sql::dml::{InsertQuery, UpdateQuery, DeleteQuery};
//! use sqlom::sql::expr::{col, ExprExt};
//!
//! let insert = InsertQuery::into("users")
//!     .set("name", "Alice")
//!     .set("email", "alice@example.com");
//!
//! let update = UpdateQuery::table("users")
//!     .set("status", "active")
//!     .filter(col("id").eq(1));
//!
//! let delete = DeleteQuery::from("users").filter(col("status").eq("inactive"));
//! ```

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::expr::Expr;
use super::predicate::{WhereClause, WhereTerm};
use super::render;
use super::token::{Token, TokenStream};
use crate::error::Result;

/// A `field = value` assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTerm {
    pub field: String,
    pub value: Expr,
}

impl UpdateTerm {
    pub fn new(field: &str, value: impl Into<Expr>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

fn target(table: &str, namespace: Option<&str>) -> Token {
    Token::QualifiedIdent {
        schema: namespace.map(String::from),
        name: table.into(),
    }
}

// ============================================================================
// INSERT
// ============================================================================

/// Single-row INSERT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct InsertQuery {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub terms: Vec<UpdateTerm>,
}

impl InsertQuery {
    pub fn into(table: &str) -> Self {
        Self {
            table: table.into(),
            namespace: None,
            terms: vec![],
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a field value.
    pub fn set(mut self, field: &str, value: impl Into<Expr>) -> Self {
        self.terms.push(UpdateTerm::new(field, value));
        self
    }

    /// Value assigned to `field`, if any.
    pub fn value_of(&self, field: &str) -> Option<&Expr> {
        self.terms
            .iter()
            .find(|t| t.field == field)
            .map(|t| &t.value)
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_insert(self, dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(target(&self.table, self.namespace.as_deref()))
            .space();
        ts.append(&field_list(self.terms.iter().map(|t| t.field.as_str())));
        ts.space().push(Token::Values).space();
        let values = self.terms.iter().map(|t| &t.value).collect::<Vec<_>>();
        ts.append(&value_row(&values, dialect)?);
        Ok(ts)
    }
}

fn field_list<'a>(fields: impl Iterator<Item = &'a str>) -> TokenStream {
    let fields = fields
        .map(|f| TokenStream::from(Token::Ident(f.into())))
        .collect::<Vec<_>>();
    let mut ts = TokenStream::new();
    ts.lparen().append_list(&fields).rparen();
    ts
}

fn value_row(values: &[&Expr], dialect: Dialect) -> Result<TokenStream> {
    let values = values
        .iter()
        .map(|v| v.to_tokens(dialect))
        .collect::<Result<Vec<_>>>()?;
    let mut ts = TokenStream::new();
    ts.lparen().append_list(&values).rparen();
    Ok(ts)
}

// ============================================================================
// BULK INSERT
// ============================================================================

/// Multi-row INSERT. Rows share a table and a field set; values are constants.
///
/// Fields are written in the first row's order; later rows may list them in
/// any order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct BulkInsertQuery {
    pub rows: Vec<InsertQuery>,
}

impl BulkInsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: InsertQuery) -> Self {
        self.rows.push(row);
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_bulk_insert(self, dialect)
    }

    /// Render the statement. Expects a validated value: every row carries every field.
    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        let Some(first) = self.rows.first() else {
            return Ok(ts);
        };
        let fields = first
            .terms
            .iter()
            .map(|t| t.field.as_str())
            .collect::<Vec<_>>();

        let null = Expr::Null;
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let values = fields
                .iter()
                .map(|f| row.value_of(f).unwrap_or(&null))
                .collect::<Vec<_>>();
            rows.push(values);
        }

        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(target(&first.table, first.namespace.as_deref()))
            .space();
        ts.append(&field_list(fields.iter().copied()));

        if dialect.supports_multi_row_values() {
            ts.space().push(Token::Values).space();
            let rendered = rows
                .iter()
                .map(|values| value_row(values, dialect))
                .collect::<Result<Vec<_>>>()?;
            ts.append_list(&rendered);
        } else {
            // INSERT INTO t (..) SELECT .. FROM DUAL UNION ALL SELECT .. FROM DUAL
            for (i, values) in rows.iter().enumerate() {
                if i > 0 {
                    ts.space().push(Token::Union).space().push(Token::All);
                }
                ts.space().push(Token::Select).space();
                let values = values
                    .iter()
                    .map(|v| v.to_tokens(dialect))
                    .collect::<Result<Vec<_>>>()?;
                ts.append_list(&values);
                ts.space().push(Token::From).space().push(Token::Dual);
            }
        }

        Ok(ts)
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct UpdateQuery {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub terms: Vec<UpdateTerm>,
    #[serde(default)]
    pub where_clause: WhereClause,
}

impl UpdateQuery {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn set(mut self, field: &str, value: impl Into<Expr>) -> Self {
        self.terms.push(UpdateTerm::new(field, value));
        self
    }

    pub fn filter(mut self, term: WhereTerm) -> Self {
        self.where_clause.terms.push(term);
        self
    }

    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clause = clause;
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_update(self, dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Update)
            .space()
            .push(target(&self.table, self.namespace.as_deref()))
            .space()
            .push(Token::Set)
            .space();

        let mut assignments = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let mut a = TokenStream::new();
            a.push(Token::Ident(term.field.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&term.value.to_tokens(dialect)?);
            assignments.push(a);
        }
        ts.append_list(&assignments);
        ts.append(&self.where_clause.to_phrase(Token::Where, dialect)?);
        Ok(ts)
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct DeleteQuery {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub where_clause: WhereClause,
}

impl DeleteQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn filter(mut self, term: WhereTerm) -> Self {
        self.where_clause.terms.push(term);
        self
    }

    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clause = clause;
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_delete(self, dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .push(target(&self.table, self.namespace.as_deref()));
        ts.append(&self.where_clause.to_phrase(Token::Where, dialect)?);
        Ok(ts)
    }
}
