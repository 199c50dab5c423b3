//! FROM clause: tables, derived tables and joins.

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::predicate::WhereClause;
use super::query::SelectQuery;
use super::token::{Token, TokenStream};
use crate::error::{Error, Result};

/// What a FROM term reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FromSource {
    Table {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
    SubQuery(Box<SelectQuery>),
    /// Raw derived-table SQL, parenthesised on output.
    SubQueryText(String),
    /// A reference to an alias introduced elsewhere, such as a CTE name.
    AliasRef(String),
}

/// One source in a FROM clause, optionally aliased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct FromTerm {
    pub source: FromSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl FromTerm {
    pub fn table(name: &str) -> Self {
        Self {
            source: FromSource::Table {
                name: name.into(),
                namespace: None,
            },
            alias: None,
        }
    }

    /// A table inside an explicit namespace (schema).
    pub fn table_in(namespace: &str, name: &str) -> Self {
        Self {
            source: FromSource::Table {
                name: name.into(),
                namespace: Some(namespace.into()),
            },
            alias: None,
        }
    }

    pub fn subquery(query: SelectQuery, alias: &str) -> Self {
        Self {
            source: FromSource::SubQuery(Box::new(query)),
            alias: Some(alias.into()),
        }
    }

    pub fn subquery_text(sql: &str, alias: &str) -> Self {
        Self {
            source: FromSource::SubQueryText(sql.into()),
            alias: Some(alias.into()),
        }
    }

    pub fn alias_ref(name: &str) -> Self {
        Self {
            source: FromSource::AliasRef(name.into()),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name other clauses use to refer to this source: alias, else table name.
    pub fn ref_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        match &self.source {
            FromSource::Table { name, .. } => Some(name),
            FromSource::AliasRef(name) => Some(name),
            FromSource::SubQuery(_) | FromSource::SubQueryText(_) => None,
        }
    }

    /// Whether this is a derived table (nested statement or raw text).
    pub fn is_derived(&self) -> bool {
        matches!(
            self.source,
            FromSource::SubQuery(_) | FromSource::SubQueryText(_)
        )
    }

    /// Render the term. Tables without a namespace take `table_space` when set.
    pub fn to_tokens(&self, dialect: Dialect, table_space: Option<&str>) -> Result<TokenStream> {
        let mut ts = TokenStream::new();

        match &self.source {
            FromSource::Table { name, namespace } => {
                let schema = namespace.as_deref().or(table_space).map(String::from);
                ts.push(Token::QualifiedIdent {
                    schema,
                    name: name.clone(),
                });
            }
            FromSource::SubQuery(query) => {
                ts.lparen().append(&query.to_tokens(dialect)?).rparen();
            }
            FromSource::SubQueryText(sql) => {
                ts.lparen().push(Token::Raw(sql.clone())).rparen();
            }
            FromSource::AliasRef(name) => {
                ts.push(Token::Ident(name.clone()));
            }
        }

        if let Some(alias) = &self.alias {
            ts.space();
            if dialect.table_alias_keyword() {
                ts.push(Token::As).space();
            }
            ts.push(Token::Ident(alias.clone()));
        }

        Ok(ts)
    }
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    fn to_tokens(self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        match self {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left),
            JoinType::Right => ts.push(Token::Right),
            JoinType::Full => {
                if !dialect.supports_full_outer_join() {
                    return Err(Error::unsupported("FULL OUTER JOIN", dialect.name()));
                }
                ts.push(Token::Full).space().push(Token::Outer)
            }
            JoinType::Cross => ts.push(Token::Cross),
        };
        ts.space().push(Token::Join);
        Ok(ts)
    }
}

/// How the joined source is matched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    /// Field equalities between a named left source and the joined source.
    Fields {
        left: String,
        pairs: Vec<(String, String)>,
    },
    /// An arbitrary predicate.
    Clause(WhereClause),
    /// No condition; only valid for CROSS joins.
    #[default]
    None,
}

/// A join step appended to the base source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub right: FromTerm,
    #[serde(default)]
    pub condition: JoinCondition,
}

impl Join {
    pub fn new(join_type: JoinType, right: FromTerm, condition: JoinCondition) -> Self {
        Self {
            join_type,
            right,
            condition,
        }
    }

    /// Join on `left.lf = right.rf` for every field pair.
    pub fn on_fields(join_type: JoinType, right: FromTerm, left: &str, pairs: &[(&str, &str)]) -> Self {
        Self::new(
            join_type,
            right,
            JoinCondition::Fields {
                left: left.into(),
                pairs: pairs
                    .iter()
                    .map(|(l, r)| ((*l).to_string(), (*r).to_string()))
                    .collect(),
            },
        )
    }

    pub fn cross(right: FromTerm) -> Self {
        Self::new(JoinType::Cross, right, JoinCondition::None)
    }

    fn to_tokens(&self, dialect: Dialect, table_space: Option<&str>) -> Result<TokenStream> {
        let mut ts = self.join_type.to_tokens(dialect)?;
        ts.space().append(&self.right.to_tokens(dialect, table_space)?);

        match &self.condition {
            JoinCondition::Fields { left, pairs } => {
                let right = self.right.ref_name().unwrap_or_default();
                ts.space().push(Token::On).space();
                for (i, (lf, rf)) in pairs.iter().enumerate() {
                    if i > 0 {
                        ts.space().push(Token::And).space();
                    }
                    ts.push(Token::Ident(left.clone()))
                        .push(Token::Dot)
                        .push(Token::Ident(lf.clone()));
                    ts.space().push(Token::Eq).space();
                    ts.push(Token::Ident(right.to_string()))
                        .push(Token::Dot)
                        .push(Token::Ident(rf.clone()));
                }
            }
            JoinCondition::Clause(clause) => {
                ts.space().push(Token::On).space();
                ts.append(&clause.to_tokens(dialect)?);
            }
            JoinCondition::None => {}
        }

        Ok(ts)
    }
}

/// The FROM clause of a SELECT: a base source and its joins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FromClause {
    pub base: Option<FromTerm>,
    pub joins: Vec<Join>,
}

impl FromClause {
    pub fn new(base: FromTerm) -> Self {
        Self {
            base: Some(base),
            joins: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none()
    }

    /// Every source in declaration order: base first, then joined sources.
    pub fn terms(&self) -> impl Iterator<Item = &FromTerm> {
        self.base.iter().chain(self.joins.iter().map(|j| &j.right))
    }

    /// Render without the leading FROM keyword.
    pub fn to_tokens(&self, dialect: Dialect, table_space: Option<&str>) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if let Some(base) = &self.base {
            ts.append(&base.to_tokens(dialect, table_space)?);
        }
        for join in &self.joins {
            ts.space().append(&join.to_tokens(dialect, table_space)?);
        }
        Ok(ts)
    }
}
