//! SELECT statements and unions, built with a fluent API.

use serde::{Deserialize, Serialize};

use super::dialect::{helpers, Dialect, GroupModifierStyle, PagingStrategy, SqlDialect, TopPlacement};
use super::expr::{count_star, Expr, ExprExt};
use super::from::{FromClause, FromTerm, Join};
use super::paging;
use super::predicate::{WhereClause, WhereTerm};
use super::render;
use super::token::{Token, TokenStream};
use crate::error::{Error, Result};

// =============================================================================
// Select list
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct SelectColumn {
    pub expr: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name of the produced column: the alias, else the field name.
    pub fn output_name(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.expr.output_name())
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = self.expr.to_tokens(dialect)?;
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        Ok(ts)
    }
}

impl From<Expr> for SelectColumn {
    fn from(expr: Expr) -> Self {
        SelectColumn::new(expr)
    }
}

// =============================================================================
// ORDER BY / GROUP BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY term over a (possibly qualified) field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct OrderByTerm {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderByTerm {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.into(),
            table: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn asc(field: &str) -> Self {
        Self::new(field)
    }

    pub fn desc(field: &str) -> Self {
        Self::new(field).direction(SortDirection::Desc)
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Render `[table.]field ASC|DESC`. The direction is always explicit.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = qualified_field(self.table.as_deref(), &self.field);
        ts.space().push(match self.direction {
            SortDirection::Asc => Token::Asc,
            SortDirection::Desc => Token::Desc,
        });
        ts
    }
}

/// A GROUP BY term over a (possibly qualified) field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct GroupByTerm {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl GroupByTerm {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.into(),
            table: None,
        }
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        qualified_field(self.table.as_deref(), &self.field)
    }
}

impl From<&str> for GroupByTerm {
    fn from(field: &str) -> Self {
        GroupByTerm::new(field)
    }
}

/// Super-aggregate modifier applied to GROUP BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupModifier {
    #[default]
    None,
    Cube,
    Rollup,
}

/// A page request: zero-based page index and rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page_index: u64,
    pub page_size: u64,
}

impl Paging {
    /// Zero-based offset of the first row on the page.
    pub fn offset(&self) -> u64 {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Rows on this page, capped so the page never reaches past `top`.
    pub fn limit(&self, top: Option<u64>) -> u64 {
        match top {
            Some(top) => self.page_size.min(top.saturating_sub(self.offset())),
            None => self.page_size,
        }
    }
}

fn qualified_field(table: Option<&str>, field: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    if let Some(t) = table {
        ts.push(Token::Ident(t.into())).push(Token::Dot);
    }
    ts.push(Token::Ident(field.into()));
    ts
}

// =============================================================================
// SelectQuery
// =============================================================================

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "SelectQuery has no effect until rendered with to_sql() or to_tokens()"]
pub struct SelectQuery {
    pub columns: Vec<SelectColumn>,
    pub from: FromClause,
    pub where_clause: WhereClause,
    pub group_by: Vec<GroupByTerm>,
    pub group_modifier: GroupModifier,
    pub having: WhereClause,
    pub order_by: Vec<OrderByTerm>,
    pub distinct: bool,
    /// Maximum number of rows; `None` is unbounded.
    pub top: Option<u64>,
    pub paging: Option<Paging>,
    /// Namespace for tables that do not name one.
    pub table_space: Option<String>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base source.
    pub fn from(mut self, term: FromTerm) -> Self {
        self.from.base = Some(term);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.from.joins.push(join);
        self
    }

    pub fn column(mut self, column: impl Into<SelectColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn column_as(self, expr: Expr, alias: &str) -> Self {
        self.column(expr.alias(alias))
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<SelectColumn>>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a predicate to the top-level WHERE clause.
    pub fn filter(mut self, term: WhereTerm) -> Self {
        self.where_clause.terms.push(term);
        self
    }

    /// Replace the WHERE clause.
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clause = clause;
        self
    }

    pub fn group_by(mut self, term: impl Into<GroupByTerm>) -> Self {
        self.group_by.push(term.into());
        self
    }

    pub fn with_cube(mut self) -> Self {
        self.group_modifier = GroupModifier::Cube;
        self
    }

    pub fn with_rollup(mut self) -> Self {
        self.group_modifier = GroupModifier::Rollup;
        self
    }

    pub fn having(mut self, clause: WhereClause) -> Self {
        self.having = clause;
        self
    }

    pub fn order_by(mut self, term: OrderByTerm) -> Self {
        self.order_by.push(term);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn top(mut self, n: u64) -> Self {
        self.top = Some(n);
        self
    }

    /// Request page `page_index` (zero-based) of `page_size` rows.
    pub fn page(mut self, page_index: u64, page_size: u64) -> Self {
        self.paging = Some(Paging {
            page_index,
            page_size,
        });
        self
    }

    pub fn table_space(mut self, namespace: &str) -> Self {
        self.table_space = Some(namespace.into());
        self
    }

    /// Companion statement counting the rows this query returns.
    ///
    /// Ordering and paging are dropped; `top` still caps the count.
    pub fn row_count(&self) -> SelectQuery {
        let mut inner = self.clone();
        inner.order_by.clear();
        inner.paging = None;

        SelectQuery::new()
            .column(count_star().alias("cnt"))
            .from(FromTerm::subquery(inner, "t"))
    }

    /// Validate, then render for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_select(self, dialect)
    }

    /// Convert to tokens for a specific dialect.
    ///
    /// On ROW_NUMBER dialects a paged query is rewritten first.
    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        if self.paging.is_some() && dialect.paging_strategy() == PagingStrategy::RowNumberWrapper {
            return paging::row_number_rewrite(self)?.to_tokens(dialect);
        }

        let table_space = self.table_space.as_deref();
        let prefix_top = dialect.top_placement() == TopPlacement::Prefix;
        let mut ts = TokenStream::new();

        // SELECT [DISTINCT] [TOP n]
        ts.push(Token::Select);
        if self.distinct {
            ts.space().push(Token::Distinct);
        }
        if prefix_top {
            if let Some(n) = self.top {
                ts.space().push(Token::Top).space().push(helpers::row_count(n));
            }
        }
        ts.space();

        if self.columns.is_empty() {
            ts.push(Token::Star);
        } else {
            let columns = self
                .columns
                .iter()
                .map(|c| c.to_tokens(dialect))
                .collect::<Result<Vec<_>>>()?;
            ts.append_list(&columns);
        }

        if !self.from.is_empty() {
            ts.space().push(Token::From).space();
            ts.append(&self.from.to_tokens(dialect, table_space)?);
        }

        ts.append(&self.where_clause.to_phrase(Token::Where, dialect)?);

        if !self.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            ts.append(&self.group_by_tokens(dialect)?);
        }

        ts.append(&self.having.to_phrase(Token::Having, dialect)?);

        if !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            let terms = self
                .order_by
                .iter()
                .map(OrderByTerm::to_tokens)
                .collect::<Vec<_>>();
            ts.append_list(&terms);
        }

        let (limit, offset) = match self.paging {
            Some(paging) => (Some(paging.limit(self.top)), Some(paging.offset())),
            None if prefix_top => (None, None),
            None => (self.top, None),
        };
        let suffix = dialect.emit_limit_offset(limit, offset);
        if !suffix.is_empty() {
            ts.space().append(&suffix);
        }

        Ok(ts)
    }

    fn group_by_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let terms = self
            .group_by
            .iter()
            .map(GroupByTerm::to_tokens)
            .collect::<Vec<_>>();

        let modifier = match self.group_modifier {
            GroupModifier::None => None,
            GroupModifier::Cube => {
                if !dialect.supports_cube() {
                    return Err(Error::unsupported("GROUP BY CUBE", dialect.name()));
                }
                Some(Token::Cube)
            }
            GroupModifier::Rollup => Some(Token::Rollup),
        };

        let mut ts = TokenStream::new();
        match (modifier, dialect.group_modifier_style()) {
            (None, _) => {
                ts.append_list(&terms);
            }
            (Some(m), GroupModifierStyle::Suffix) => {
                ts.append_list(&terms);
                ts.space().push(Token::With).space().push(m);
            }
            (Some(m), GroupModifierStyle::Wrapped) => {
                ts.push(m).lparen().append_list(&terms).rparen();
            }
        }
        Ok(ts)
    }
}

// =============================================================================
// UNION
// =============================================================================

/// Whether a union connector removes duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionModifier {
    #[default]
    Distinct,
    All,
}

/// A union member. Its modifier governs the connector that precedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionMember {
    pub query: SelectQuery,
    #[serde(default)]
    pub modifier: UnionModifier,
}

/// `q0 UNION [ALL] q1 UNION [ALL] q2 ...`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "SqlUnion has no effect until rendered with to_sql() or to_tokens()"]
pub struct SqlUnion {
    pub members: Vec<UnionMember>,
}

impl SqlUnion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, query: SelectQuery, modifier: UnionModifier) -> Self {
        self.members.push(UnionMember { query, modifier });
        self
    }

    /// Append with a duplicate-removing `UNION`.
    pub fn union(self, query: SelectQuery) -> Self {
        self.add(query, UnionModifier::Distinct)
    }

    /// Append with `UNION ALL`.
    pub fn union_all(self, query: SelectQuery) -> Self {
        self.add(query, UnionModifier::All)
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        render::render_union(self, dialect)
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();

        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                ts.space().push(Token::Union);
                if member.modifier == UnionModifier::All {
                    ts.space().push(Token::All);
                }
                ts.space();
            }

            // A trailing LIMIT/FETCH would otherwise bind to the whole union
            let wrap = member.query.top.is_some() && dialect.top_placement() == TopPlacement::Suffix;
            if wrap {
                ts.lparen();
            }
            ts.append(&member.query.to_tokens(dialect)?);
            if wrap {
                ts.rparen();
            }
        }

        Ok(ts)
    }
}
