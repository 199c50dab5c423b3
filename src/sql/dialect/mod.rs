//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `[]` (SQL Server), `` ` `` (MySQL), `"` (Postgres/Oracle)
//! - Literal formats: national strings, hex binaries, date vs timestamp literals
//! - Null coalescing: ISNULL / IFNULL / COALESCE / NVL
//! - Date differences per unit
//! - Pagination: ROW_NUMBER() rewrite vs native LIMIT/OFFSET
//!
//! # Usage
//!
//! ```ignore
//! use sqlom::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::SqlServer;
//! let quoted = dialect.quote_identifier("user");  // [user]
//! ```
//!
//! | Feature | SQL Server | Oracle | MySQL | Postgres |
//! |---------|-----------|--------|-------|----------|
//! | Paging | ROW_NUMBER | ROW_NUMBER | LIMIT/OFFSET | LIMIT/OFFSET |
//! | TOP | `TOP n` | `FETCH FIRST` | `LIMIT` | `LIMIT` |
//! | CUBE | `WITH CUBE` | `CUBE()` | ❌ | `CUBE()` |
//! | ROLLUP | `WITH ROLLUP` | `ROLLUP()` | `WITH ROLLUP` | `ROLLUP()` |
//! | FULL JOIN | ✓ | ✓ | ❌ | ✓ |
//! | Multi-row VALUES | ✓ | ❌ (`SELECT .. FROM DUAL`) | ✓ | ✓ |

pub mod helpers;
mod mysql;
mod oracle;
mod postgres;
mod sqlserver;

pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlserver::SqlServer;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expr::DateUnit;
use super::token::TokenStream;
use crate::error::{Error, Result};

/// How a dialect restricts a statement to one page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStrategy {
    /// Rewrite the statement into nested ROW_NUMBER() wrappers.
    RowNumberWrapper,
    /// Append a trailing limit/offset clause.
    LimitOffset,
}

/// Where a row limit without paging is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopPlacement {
    /// `SELECT TOP n ...`
    Prefix,
    /// Trailing clause from `emit_limit_offset`.
    Suffix,
}

/// How CUBE/ROLLUP attach to GROUP BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupModifierStyle {
    /// `GROUP BY a, b WITH ROLLUP`
    Suffix,
    /// `GROUP BY ROLLUP(a, b)`
    Wrapped,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    /// Format a date-only literal.
    fn format_date(&self, date: NaiveDate) -> String {
        helpers::format_date_plain(date)
    }

    /// Format a date-time literal.
    fn format_datetime(&self, dt: NaiveDateTime) -> String {
        helpers::format_datetime_plain(dt)
    }

    /// Format a binary literal as hex.
    fn format_binary(&self, bytes: &[u8]) -> String;

    /// Format a guid literal. Guids travel as quoted text.
    fn format_guid(&self, guid: &Uuid) -> String {
        self.quote_string(&guid.to_string())
    }

    /// Marker prepended to bare parameter names.
    fn parameter_prefix(&self) -> char {
        '@'
    }

    fn format_parameter(&self, name: &str) -> String {
        helpers::format_parameter(self.parameter_prefix(), name)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Two-argument null-coalescing function name.
    fn null_coalesce_function(&self) -> &'static str;

    /// Emit the number of `unit` boundaries between `start` and `end`.
    ///
    /// Units the dialect cannot express fail with `Error::UnsupportedFeature`.
    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream>;

    /// Emit a bitwise AND of two operands.
    fn emit_bitwise_and(&self, left: &TokenStream, right: &TokenStream) -> TokenStream {
        helpers::binary(left, super::token::Token::BitAnd, right)
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    fn paging_strategy(&self) -> PagingStrategy {
        PagingStrategy::LimitOffset
    }

    fn top_placement(&self) -> TopPlacement {
        TopPlacement::Suffix
    }

    /// Emit LIMIT/OFFSET or equivalent trailing clause.
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    // =========================================================================
    // Statement syntax
    // =========================================================================

    fn group_modifier_style(&self) -> GroupModifierStyle {
        GroupModifierStyle::Wrapped
    }

    fn supports_cube(&self) -> bool {
        true
    }

    fn supports_full_outer_join(&self) -> bool {
        true
    }

    /// Whether `AS` may precede a table alias.
    fn table_alias_keyword(&self) -> bool {
        true
    }

    /// Whether `INSERT ... VALUES (..), (..)` is accepted.
    fn supports_multi_row_values(&self) -> bool {
        true
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    SqlServer,
    Oracle,
    MySql,
    Postgres,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::SqlServer,
        Dialect::Oracle,
        Dialect::MySql,
        Dialect::Postgres,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::SqlServer => &SqlServer,
            Dialect::Oracle => &Oracle,
            Dialect::MySql => &MySql,
            Dialect::Postgres => &Postgres,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_date(&self, date: NaiveDate) -> String {
        self.dialect().format_date(date)
    }

    fn format_datetime(&self, dt: NaiveDateTime) -> String {
        self.dialect().format_datetime(dt)
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        self.dialect().format_binary(bytes)
    }

    fn format_guid(&self, guid: &Uuid) -> String {
        self.dialect().format_guid(guid)
    }

    fn parameter_prefix(&self) -> char {
        self.dialect().parameter_prefix()
    }

    fn format_parameter(&self, name: &str) -> String {
        self.dialect().format_parameter(name)
    }

    fn null_coalesce_function(&self) -> &'static str {
        self.dialect().null_coalesce_function()
    }

    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream> {
        self.dialect().emit_date_diff(unit, start, end)
    }

    fn emit_bitwise_and(&self, left: &TokenStream, right: &TokenStream) -> TokenStream {
        self.dialect().emit_bitwise_and(left, right)
    }

    fn paging_strategy(&self) -> PagingStrategy {
        self.dialect().paging_strategy()
    }

    fn top_placement(&self) -> TopPlacement {
        self.dialect().top_placement()
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        self.dialect().emit_limit_offset(limit, offset)
    }

    fn group_modifier_style(&self) -> GroupModifierStyle {
        self.dialect().group_modifier_style()
    }

    fn supports_cube(&self) -> bool {
        self.dialect().supports_cube()
    }

    fn supports_full_outer_join(&self) -> bool {
        self.dialect().supports_full_outer_join()
    }

    fn table_alias_keyword(&self) -> bool {
        self.dialect().table_alias_keyword()
    }

    fn supports_multi_row_values(&self) -> bool {
        self.dialect().supports_multi_row_values()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}
