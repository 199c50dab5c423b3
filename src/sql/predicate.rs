//! Predicate tree: `WhereClause` / `WhereTerm`.
//!
//! A clause joins its direct children with one relationship (AND or OR).
//! Terms render before nested clauses; non-empty nested clauses are
//! parenthesised and empty ones vanish.

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::expr::Expr;
use super::query::SelectQuery;
use super::token::{Token, TokenStream};
use super::value::Constant;
use crate::error::Result;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Like,
    NotLike,
    /// True when any bit of the right operand is set in the left.
    BitwiseAnd,
}

/// A nested statement or raw subquery text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubQuery {
    Query(Box<SelectQuery>),
    Text(String),
}

impl SubQuery {
    fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        Ok(match self {
            SubQuery::Query(q) => q.to_tokens(dialect)?,
            SubQuery::Text(sql) => Token::Raw(sql.clone()).into(),
        })
    }
}

/// A single predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereTerm {
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    Between {
        expr: Expr,
        low: Expr,
        high: Expr,
        #[serde(default)]
        negated: bool,
    },
    InList {
        expr: Expr,
        values: Vec<Constant>,
        #[serde(default)]
        negated: bool,
    },
    InSubQuery {
        expr: Expr,
        subquery: SubQuery,
        #[serde(default)]
        negated: bool,
    },
    IsNull {
        expr: Expr,
        #[serde(default)]
        negated: bool,
    },
    Exists {
        subquery: SubQuery,
        #[serde(default)]
        negated: bool,
    },
    /// Raw predicate text, rendered verbatim.
    Raw(String),
}

impl WhereTerm {
    pub fn exists(query: SelectQuery) -> Self {
        WhereTerm::Exists {
            subquery: SubQuery::Query(Box::new(query)),
            negated: false,
        }
    }

    pub fn not_exists(query: SelectQuery) -> Self {
        WhereTerm::Exists {
            subquery: SubQuery::Query(Box::new(query)),
            negated: true,
        }
    }

    pub fn raw(sql: &str) -> Self {
        WhereTerm::Raw(sql.into())
    }

    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();

        match self {
            WhereTerm::Compare { left, op, right } => {
                let left = left.to_tokens(dialect)?;
                let right = right.to_tokens(dialect)?;
                let op_token = match op {
                    CompareOp::Equal => Token::Eq,
                    CompareOp::NotEqual => Token::Ne,
                    CompareOp::Greater => Token::Gt,
                    CompareOp::GreaterOrEqual => Token::Gte,
                    CompareOp::Less => Token::Lt,
                    CompareOp::LessOrEqual => Token::Lte,
                    CompareOp::Like => Token::Like,
                    CompareOp::NotLike => Token::Raw("NOT LIKE".into()),
                    CompareOp::BitwiseAnd => {
                        ts.append(&dialect.emit_bitwise_and(&left, &right));
                        ts.space().push(Token::Ne).space().push(Token::LitInt(0));
                        return Ok(ts);
                    }
                };
                ts.append(&left).space().push(op_token).space().append(&right);
            }

            WhereTerm::Between {
                expr,
                low,
                high,
                negated,
            } => {
                ts.append(&expr.to_tokens(dialect)?);
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::Between).space();
                ts.append(&low.to_tokens(dialect)?);
                ts.space().push(Token::And).space();
                ts.append(&high.to_tokens(dialect)?);
            }

            WhereTerm::InList {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL: an empty list matches nothing
                if values.is_empty() {
                    ts.push(Token::LitInt(1)).space().push(Token::Eq).space();
                    ts.push(Token::LitInt(if *negated { 1 } else { 0 }));
                } else {
                    ts.append(&expr.to_tokens(dialect)?);
                    if *negated {
                        ts.space().push(Token::Not);
                    }
                    ts.space().push(Token::In).space().lparen();
                    let values = values
                        .iter()
                        .map(|v| TokenStream::from(v.to_token()))
                        .collect::<Vec<_>>();
                    ts.append_list(&values);
                    ts.rparen();
                }
            }

            WhereTerm::InSubQuery {
                expr,
                subquery,
                negated,
            } => {
                ts.append(&expr.to_tokens(dialect)?);
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::In).space().lparen();
                ts.append(&subquery.to_tokens(dialect)?);
                ts.rparen();
            }

            WhereTerm::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens(dialect)?).space();
                ts.push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            WhereTerm::Exists { subquery, negated } => {
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::Exists).space().lparen();
                ts.append(&subquery.to_tokens(dialect)?);
                ts.rparen();
            }

            WhereTerm::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }

        Ok(ts)
    }
}

/// How the direct children of a clause combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[default]
    And,
    Or,
}

/// A recursive AND/OR composition of predicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "builders have no effect until used"]
pub struct WhereClause {
    pub relationship: Relationship,
    pub terms: Vec<WhereTerm>,
    pub clauses: Vec<WhereClause>,
}

impl WhereClause {
    pub fn new(relationship: Relationship) -> Self {
        Self {
            relationship,
            terms: vec![],
            clauses: vec![],
        }
    }

    pub fn and() -> Self {
        Self::new(Relationship::And)
    }

    pub fn or() -> Self {
        Self::new(Relationship::Or)
    }

    /// Add a predicate.
    pub fn term(mut self, term: WhereTerm) -> Self {
        self.terms.push(term);
        self
    }

    /// Add a nested clause.
    pub fn clause(mut self, clause: WhereClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// True when no predicate exists anywhere below this clause.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.clauses.iter().all(WhereClause::is_empty)
    }

    /// Render the predicate without a leading keyword. Empty clauses yield an empty stream.
    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut parts = Vec::with_capacity(self.terms.len() + self.clauses.len());
        for term in &self.terms {
            parts.push(term.to_tokens(dialect)?);
        }
        for clause in self.clauses.iter().filter(|c| !c.is_empty()) {
            let mut ts = TokenStream::new();
            ts.lparen().append(&clause.to_tokens(dialect)?).rparen();
            parts.push(ts);
        }

        let connector = match self.relationship {
            Relationship::And => Token::And,
            Relationship::Or => Token::Or,
        };

        let mut ts = TokenStream::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                ts.space().push(connector.clone()).space();
            }
            ts.append(part);
        }
        Ok(ts)
    }

    /// Render `<space>KEYWORD predicate` or nothing when empty.
    pub(crate) fn to_phrase(&self, keyword: Token, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if !self.is_empty() {
            ts.space().push(keyword).space();
            ts.append(&self.to_tokens(dialect)?);
        }
        Ok(ts)
    }
}

impl From<WhereTerm> for WhereClause {
    fn from(term: WhereTerm) -> Self {
        WhereClause::and().term(term)
    }
}
