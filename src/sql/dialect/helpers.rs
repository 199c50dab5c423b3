//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use chrono::{NaiveDate, NaiveDateTime};

use super::super::token::{Token, TokenStream};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, Oracle
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: SQL Server
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// Literals
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with the national-character prefix.
/// Used by: SQL Server for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

/// Format boolean as keyword TRUE/FALSE.
/// Used by: Postgres
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: SQL Server, MySQL, Oracle
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// `'YYYY-MM-DD'`
pub fn format_date_plain(date: NaiveDate) -> String {
    format!("'{}'", date.format(DATE_FORMAT))
}

/// `'YYYY-MM-DD HH:MM:SS[.fff]'`
pub fn format_datetime_plain(dt: NaiveDateTime) -> String {
    format!("'{}'", dt.format(DATETIME_FORMAT))
}

/// `DATE 'YYYY-MM-DD'`
pub fn format_date_typed(date: NaiveDate) -> String {
    format!("DATE '{}'", date.format(DATE_FORMAT))
}

/// `TIMESTAMP 'YYYY-MM-DD HH:MM:SS[.fff]'`
pub fn format_timestamp_typed(dt: NaiveDateTime) -> String {
    format!("TIMESTAMP '{}'", dt.format(DATETIME_FORMAT))
}

/// Uppercase hex digits without prefix.
pub fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// Prefix a parameter name unless the caller already supplied a marker.
pub fn format_parameter(prefix: char, name: &str) -> String {
    if name.starts_with(['@', ':', '?', '$']) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
/// Used by: Postgres, MySQL
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit)
            .space()
            .push(row_count(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(row_count(off));
    }

    ts
}

/// Emit `[OFFSET m ROWS] FETCH FIRST|NEXT n ROWS ONLY`.
/// Used by: Oracle
pub fn emit_limit_offset_fetch(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(off) = offset {
        ts.push(Token::Offset)
            .space()
            .push(row_count(off))
            .space()
            .push(Token::Rows);
    }

    if let Some(lim) = limit {
        if offset.is_some() {
            ts.space();
        }
        ts.push(Token::Fetch)
            .space()
            .push(if offset.is_some() {
                Token::Next
            } else {
                Token::First
            })
            .space()
            .push(row_count(lim))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

// =============================================================================
// Expression building
// =============================================================================

/// `NAME(arg, arg, ...)`
pub fn call(name: &str, args: &[&TokenStream]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName(name.into())).lparen();
    ts.append_list(args.iter().copied());
    ts.rparen();
    ts
}

/// `(left op right)`
pub fn binary(left: &TokenStream, op: Token, right: &TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.lparen()
        .append(left)
        .space()
        .push(op)
        .space()
        .append(right)
        .rparen();
    ts
}

/// `EXTRACT(FIELD FROM expr)`
pub fn extract(field: &str, source: &TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("EXTRACT".into()))
        .lparen()
        .push(Token::Raw(field.into()))
        .space()
        .push(Token::From)
        .space()
        .append(source)
        .rparen();
    ts
}

/// A string literal operand, e.g. a date part name.
pub fn text(s: &str) -> TokenStream {
    Token::LitString(s.into()).into()
}

/// `CAST(expr AS type)`
pub fn cast(expr: &TokenStream, ty: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("CAST".into()))
        .lparen()
        .append(expr)
        .space()
        .push(Token::As)
        .space()
        .push(Token::Raw(ty.into()))
        .rparen();
    ts
}

/// A row count literal; counts beyond `i64::MAX` saturate.
pub fn row_count(n: u64) -> Token {
    Token::LitInt(i64::try_from(n).unwrap_or(i64::MAX))
}

pub fn int(n: i64) -> TokenStream {
    Token::LitInt(n).into()
}
