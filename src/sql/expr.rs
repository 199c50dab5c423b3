//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::predicate::{CompareOp, SubQuery, WhereClause, WhereTerm};
use super::query::{OrderByTerm, SelectColumn, SelectQuery};
use super::token::{Token, TokenStream};
use super::value::{Constant, Number};
use crate::error::{Error, Result};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Column reference: optional_table.name
    Field {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<String>,
    },

    Constant(Constant),

    /// Named parameter: `@name` / `:name`
    Parameter(String),

    /// Raw SQL expression passed directly to output without escaping.
    ///
    /// # Security Warning
    ///
    /// **Never pass user input to this variant.** The caller owns escaping.
    Raw(String),

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// Aggregate call; `Count` without an argument is `COUNT(*)`.
    Aggregate {
        func: AggregateFunction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arg: Option<Box<Expr>>,
        #[serde(default)]
        distinct: bool,
    },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        branches: Vec<CaseBranch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_expr: Option<Box<Expr>>,
    },

    /// Arithmetic: (left op right)
    BinaryOp {
        left: Box<Expr>,
        op: ArithmeticOp,
        right: Box<Expr>,
    },

    /// Number of `unit` boundaries crossed between `start` and `end`, the way
    /// SQL Server's DATEDIFF counts them. Weeks start on Sunday.
    DateDiff {
        unit: DateUnit,
        start: Box<Expr>,
        end: Box<Expr>,
    },

    /// Two-argument null coalescing.
    IfNull { value: Box<Expr>, fallback: Box<Expr> },

    /// Scalar subquery: (SELECT ...)
    SubQuery(Box<SelectQuery>),

    /// Wildcard: * or table.*
    Star {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<String>,
    },

    /// ROW_NUMBER() OVER (ORDER BY ...)
    RowNumber { order_by: Vec<OrderByTerm> },

    Null,
}

/// One `WHEN condition THEN result` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub when: WhereClause,
    pub then: Expr,
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Sum,
    Count,
    Avg,
    Min,
    Max,
    /// GROUPING(col): 1 on CUBE/ROLLUP super-aggregate rows.
    Grouping,
}

impl AggregateFunction {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Grouping => "GROUPING",
        }
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    fn token(self) -> Token {
        match self {
            ArithmeticOp::Add => Token::Plus,
            ArithmeticOp::Subtract => Token::Minus,
            ArithmeticOp::Multiply => Token::Mul,
            ArithmeticOp::Divide => Token::Div,
        }
    }
}

/// Units understood by [`Expr::DateDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    Year,
    Quarter,
    Month,
    DayOfYear,
    Day,
    Week,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl DateUnit {
    pub const ALL: [DateUnit; 12] = [
        DateUnit::Year,
        DateUnit::Quarter,
        DateUnit::Month,
        DateUnit::DayOfYear,
        DateUnit::Day,
        DateUnit::Week,
        DateUnit::Hour,
        DateUnit::Minute,
        DateUnit::Second,
        DateUnit::Millisecond,
        DateUnit::Microsecond,
        DateUnit::Nanosecond,
    ];

    /// Upper-case unit keyword as SQL Server spells it.
    pub fn keyword(&self) -> &'static str {
        match self {
            DateUnit::Year => "YEAR",
            DateUnit::Quarter => "QUARTER",
            DateUnit::Month => "MONTH",
            DateUnit::DayOfYear => "DAYOFYEAR",
            DateUnit::Day => "DAY",
            DateUnit::Week => "WEEK",
            DateUnit::Hour => "HOUR",
            DateUnit::Minute => "MINUTE",
            DateUnit::Second => "SECOND",
            DateUnit::Millisecond => "MILLISECOND",
            DateUnit::Microsecond => "MICROSECOND",
            DateUnit::Nanosecond => "NANOSECOND",
        }
    }
}

impl FromStr for DateUnit {
    type Err = Error;

    /// Accepts full names and the SQL Server abbreviations (`yy`, `qq`, `mm`, ...).
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "year" | "yy" | "yyyy" => DateUnit::Year,
            "quarter" | "qq" | "q" => DateUnit::Quarter,
            "month" | "mm" | "m" => DateUnit::Month,
            "dayofyear" | "dy" | "y" => DateUnit::DayOfYear,
            "day" | "dd" | "d" => DateUnit::Day,
            "week" | "wk" | "ww" => DateUnit::Week,
            "hour" | "hh" => DateUnit::Hour,
            "minute" | "mi" | "n" => DateUnit::Minute,
            "second" | "ss" | "s" => DateUnit::Second,
            "millisecond" | "ms" => DateUnit::Millisecond,
            "microsecond" | "mcs" => DateUnit::Microsecond,
            "nanosecond" | "ns" => DateUnit::Nanosecond,
            _ => return Err(Error::UnknownDateUnit(s.to_string())),
        })
    }
}

impl Expr {
    /// Convert this expression to a token stream for a specific dialect.
    pub fn to_tokens(&self, dialect: Dialect) -> Result<TokenStream> {
        let mut ts = TokenStream::new();

        match self {
            Expr::Field { name, table } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(name.clone()));
            }

            Expr::Constant(c) => {
                ts.push(c.to_token());
            }

            Expr::Parameter(name) => {
                ts.push(Token::Param(name.clone()));
            }

            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                let args = args
                    .iter()
                    .map(|a| a.to_tokens(dialect))
                    .collect::<Result<Vec<_>>>()?;
                ts.append_list(&args);
                ts.rparen();
            }

            Expr::Aggregate {
                func,
                arg,
                distinct,
            } => {
                ts.push(Token::FunctionName(func.name().into()));
                ts.lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                match arg {
                    Some(arg) => ts.append(&arg.to_tokens(dialect)?),
                    None => ts.push(Token::Star),
                };
                ts.rparen();
            }

            Expr::Case {
                branches,
                else_expr,
            } => {
                ts.push(Token::Case);
                for branch in branches {
                    ts.space().push(Token::When).space();
                    ts.append(&branch.when.to_tokens(dialect)?);
                    ts.space().push(Token::Then).space();
                    ts.append(&branch.then.to_tokens(dialect)?);
                }
                if let Some(else_expr) = else_expr {
                    ts.space().push(Token::Else).space();
                    ts.append(&else_expr.to_tokens(dialect)?);
                }
                ts.space().push(Token::End);
            }

            Expr::BinaryOp { left, op, right } => {
                ts.lparen();
                ts.append(&left.to_tokens(dialect)?);
                ts.space().push(op.token()).space();
                ts.append(&right.to_tokens(dialect)?);
                ts.rparen();
            }

            Expr::DateDiff { unit, start, end } => {
                let start = start.to_tokens(dialect)?;
                let end = end.to_tokens(dialect)?;
                ts.append(&dialect.emit_date_diff(*unit, &start, &end)?);
            }

            Expr::IfNull { value, fallback } => {
                ts.push(Token::FunctionName(dialect.null_coalesce_function().into()));
                ts.lparen();
                ts.append(&value.to_tokens(dialect)?);
                ts.comma().space();
                ts.append(&fallback.to_tokens(dialect)?);
                ts.rparen();
            }

            Expr::SubQuery(query) => {
                ts.lparen();
                ts.append(&query.to_tokens(dialect)?);
                ts.rparen();
            }

            Expr::Star { table } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::RowNumber { order_by } => {
                ts.push(Token::FunctionName("ROW_NUMBER".into()));
                ts.lparen().rparen();
                ts.space().push(Token::Over).space().lparen();
                ts.push(Token::OrderBy).space();
                let terms = order_by
                    .iter()
                    .map(OrderByTerm::to_tokens)
                    .collect::<Vec<_>>();
                ts.append_list(&terms);
                ts.rparen();
            }

            Expr::Null => {
                ts.push(Token::LitNull);
            }
        }

        Ok(ts)
    }

    /// The name this expression exposes as an output column, if any.
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Expr::Field { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether the value is a literal (constant or NULL).
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Constant(_) | Expr::Null)
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Field {
        name: name.into(),
        table: None,
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, name: &str) -> Expr {
    Expr::Field {
        name: name.into(),
        table: Some(table.into()),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Constant(Constant::Number(Number::Int(n)))
}

/// Create a float literal. NaN and infinities are rejected.
pub fn lit_float(f: f64) -> Result<Expr> {
    Constant::float(f).map(Expr::Constant)
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Constant(Constant::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Constant(Constant::Boolean(b))
}

/// Create a literal from any constant-convertible value.
pub fn lit(value: impl Into<Constant>) -> Expr {
    Expr::Constant(value.into())
}

/// Create a NULL literal.
pub fn null() -> Expr {
    Expr::Null
}

/// Create a named parameter.
pub fn param(name: &str) -> Expr {
    Expr::Parameter(name.into())
}

/// Create a star (*) expression.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Create a qualified star (table.*) expression.
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

/// Raw SQL, rendered verbatim.
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

fn aggregate(func: AggregateFunction, arg: Expr) -> Expr {
    Expr::Aggregate {
        func,
        arg: Some(Box::new(arg)),
        distinct: false,
    }
}

// =============================================================================
// Aggregate Functions
// =============================================================================

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Count, expr)
}

/// COUNT(*)
pub fn count_star() -> Expr {
    Expr::Aggregate {
        func: AggregateFunction::Count,
        arg: None,
        distinct: false,
    }
}

/// COUNT(DISTINCT expr)
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Aggregate {
        func: AggregateFunction::Count,
        arg: Some(Box::new(expr)),
        distinct: true,
    }
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Sum, expr)
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Avg, expr)
}

/// MIN(expr)
pub fn min(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Min, expr)
}

/// MAX(expr)
pub fn max(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Max, expr)
}

/// GROUPING(expr)
pub fn grouping(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Grouping, expr)
}

/// Null coalescing, spelled per dialect.
pub fn if_null(value: Expr, fallback: Expr) -> Expr {
    Expr::IfNull {
        value: Box::new(value),
        fallback: Box::new(fallback),
    }
}

/// Date difference in `unit` between `start` and `end`.
pub fn date_diff(unit: DateUnit, start: Expr, end: Expr) -> Expr {
    Expr::DateDiff {
        unit,
        start: Box::new(start),
        end: Box::new(end),
    }
}

/// CASE with the given arms.
pub fn case_when(branches: Vec<(WhereClause, Expr)>, else_expr: Option<Expr>) -> Expr {
    Expr::Case {
        branches: branches
            .into_iter()
            .map(|(when, then)| CaseBranch { when, then })
            .collect(),
        else_expr: else_expr.map(Box::new),
    }
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building predicates and arithmetic fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn compare(self, op: CompareOp, other: impl Into<Expr>) -> WhereTerm {
        WhereTerm::Compare {
            left: self.into_expr(),
            op,
            right: other.into(),
        }
    }

    fn eq(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::Equal, other)
    }

    fn ne(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::NotEqual, other)
    }

    fn gt(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::Greater, other)
    }

    fn gte(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::GreaterOrEqual, other)
    }

    fn lt(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::Less, other)
    }

    fn lte(self, other: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::LessOrEqual, other)
    }

    fn like(self, pattern: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::Like, pattern)
    }

    fn not_like(self, pattern: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::NotLike, pattern)
    }

    /// `(self & mask) <> 0`
    fn has_flags(self, mask: impl Into<Expr>) -> WhereTerm {
        self.compare(CompareOp::BitwiseAnd, mask)
    }

    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> WhereTerm {
        WhereTerm::Between {
            expr: self.into_expr(),
            low: low.into(),
            high: high.into(),
            negated: false,
        }
    }

    fn not_between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> WhereTerm {
        WhereTerm::Between {
            expr: self.into_expr(),
            low: low.into(),
            high: high.into(),
            negated: true,
        }
    }

    fn in_list(self, values: Vec<Constant>) -> WhereTerm {
        WhereTerm::InList {
            expr: self.into_expr(),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Constant>) -> WhereTerm {
        WhereTerm::InList {
            expr: self.into_expr(),
            values,
            negated: true,
        }
    }

    fn in_query(self, query: SelectQuery) -> WhereTerm {
        WhereTerm::InSubQuery {
            expr: self.into_expr(),
            subquery: SubQuery::Query(Box::new(query)),
            negated: false,
        }
    }

    fn not_in_query(self, query: SelectQuery) -> WhereTerm {
        WhereTerm::InSubQuery {
            expr: self.into_expr(),
            subquery: SubQuery::Query(Box::new(query)),
            negated: true,
        }
    }

    fn is_null(self) -> WhereTerm {
        WhereTerm::IsNull {
            expr: self.into_expr(),
            negated: false,
        }
    }

    fn is_not_null(self) -> WhereTerm {
        WhereTerm::IsNull {
            expr: self.into_expr(),
            negated: true,
        }
    }

    fn arith(self, op: ArithmeticOp, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    fn add(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithmeticOp::Add, other)
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithmeticOp::Subtract, other)
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithmeticOp::Multiply, other)
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithmeticOp::Divide, other)
    }

    /// Alias this expression as a select column.
    fn alias(self, name: &str) -> SelectColumn {
        SelectColumn::new(self.into_expr()).with_alias(name)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::Constant(c)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(i64::from(n))
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Constant(Constant::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<SelectQuery> for Expr {
    /// Convert a query to a scalar subquery expression.
    fn from(query: SelectQuery) -> Self {
        Expr::SubQuery(Box::new(query))
    }
}

// =============================================================================
// Tests
// =============================================================================
