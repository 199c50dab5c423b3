//! PostgreSQL dialect.
//!
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (TRUE/FALSE)
//! - Typed `DATE '..'` / `TIMESTAMP '..'` literals
//! - `:name` parameters. PostgreSQL itself only knows positional `$n`
//!   placeholders; named markers are for drivers and query layers that bind by
//!   name and rewrite to `$n` (a name given as `$1` is emitted unchanged)
//! - LIMIT/OFFSET paging
//! - Date differences built from DATE_PART, DATE_TRUNC and EXTRACT(EPOCH ...)

use chrono::{NaiveDate, NaiveDateTime};

use super::{helpers, SqlDialect};
use crate::error::{Error, Result};
use crate::sql::expr::DateUnit;
use crate::sql::token::{Token, TokenStream};

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn format_date(&self, date: NaiveDate) -> String {
        helpers::format_date_typed(date)
    }

    fn format_datetime(&self, dt: NaiveDateTime) -> String {
        helpers::format_timestamp_typed(dt)
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        format!("DECODE('{}', 'hex')", helpers::hex_upper(bytes))
    }

    /// Named markers are bound client-side; the server sees `$n`.
    fn parameter_prefix(&self) -> char {
        ':'
    }

    fn null_coalesce_function(&self) -> &'static str {
        "COALESCE"
    }

    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream> {
        let part_diff = |part: &str| {
            let part = helpers::text(part);
            helpers::binary(
                &helpers::call("DATE_PART", &[&part, end]),
                Token::Minus,
                &helpers::call("DATE_PART", &[&part, start]),
            )
        };
        let calendar_diff = |part: &str, per_year: i64| {
            helpers::binary(
                &helpers::binary(&part_diff("year"), Token::Mul, &helpers::int(per_year)),
                Token::Plus,
                &part_diff(part),
            )
        };
        let day_diff = || {
            helpers::binary(
                &helpers::cast(end, "DATE"),
                Token::Minus,
                &helpers::cast(start, "DATE"),
            )
        };
        // DATE_TRUNC('week') starts on Monday; shifting a day makes Sunday the boundary.
        let week_start = |at: &TokenStream| {
            let shifted = helpers::binary(&helpers::cast(at, "DATE"), Token::Plus, &helpers::int(1));
            helpers::cast(&helpers::call("DATE_TRUNC", &[&helpers::text("week"), &shifted]), "DATE")
        };
        // FLOOR(epoch scaled to the unit) is the boundary index of a timestamp.
        let epoch_crossed = |op: Token, factor: i64| {
            let index = |at: &TokenStream| {
                let epoch = helpers::extract("EPOCH", at);
                let scaled = if factor == 1 {
                    epoch
                } else {
                    helpers::binary(&epoch, op.clone(), &helpers::int(factor))
                };
                helpers::call("FLOOR", &[&scaled])
            };
            helpers::binary(&index(end), Token::Minus, &index(start))
        };

        Ok(match unit {
            DateUnit::Year => part_diff("year"),
            DateUnit::Quarter => calendar_diff("quarter", 4),
            DateUnit::Month => calendar_diff("month", 12),
            DateUnit::DayOfYear | DateUnit::Day => day_diff(),
            DateUnit::Week => helpers::binary(
                &helpers::binary(&week_start(end), Token::Minus, &week_start(start)),
                Token::Div,
                &helpers::int(7),
            ),
            DateUnit::Hour => epoch_crossed(Token::Div, 3600),
            DateUnit::Minute => epoch_crossed(Token::Div, 60),
            DateUnit::Second => epoch_crossed(Token::Mul, 1),
            DateUnit::Millisecond => epoch_crossed(Token::Mul, 1000),
            DateUnit::Microsecond => epoch_crossed(Token::Mul, 1_000_000),
            DateUnit::Nanosecond => {
                return Err(Error::unsupported("nanosecond date difference", self.name()))
            }
        })
    }
}
