//! Oracle dialect.
//!
//! - ANSI identifier quoting (`"`), no `AS` before table aliases
//! - Typed `DATE '..'` / `TIMESTAMP '..'` literals, `HEXTORAW('..')` binaries
//! - `:name` parameters
//! - ROW_NUMBER() wrapping for paging, `FETCH FIRST n ROWS ONLY` for TOP
//! - BITAND() instead of `&`
//! - No multi-row VALUES; bulk inserts select from DUAL
//! - Date differences from TRUNC, MONTHS_BETWEEN and DATE arithmetic (second resolution)

use chrono::{NaiveDate, NaiveDateTime};

use super::{helpers, PagingStrategy, SqlDialect};
use crate::error::{Error, Result};
use crate::sql::expr::DateUnit;
use crate::sql::token::{Token, TokenStream};

/// Oracle dialect.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_date(&self, date: NaiveDate) -> String {
        helpers::format_date_typed(date)
    }

    fn format_datetime(&self, dt: NaiveDateTime) -> String {
        helpers::format_timestamp_typed(dt)
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        format!("HEXTORAW('{}')", helpers::hex_upper(bytes))
    }

    fn parameter_prefix(&self) -> char {
        ':'
    }

    fn null_coalesce_function(&self) -> &'static str {
        "NVL"
    }

    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream> {
        let trunc = |at: &TokenStream, format: &str| helpers::call("TRUNC", &[at, &helpers::text(format)]);
        let minus = |a: TokenStream, b: TokenStream| helpers::binary(&a, Token::Minus, &b);
        let months = |format: &str| {
            helpers::call("MONTHS_BETWEEN", &[&trunc(end, format), &trunc(start, format)])
        };
        // Day fractions are inexact in NUMBER, so scaled counts are rounded.
        let scaled = |format: &str, per_day: i64| {
            let days = minus(trunc(end, format), trunc(start, format));
            helpers::call("ROUND", &[&helpers::binary(&days, Token::Mul, &helpers::int(per_day))])
        };
        let second_of_minute = |at: &TokenStream| {
            helpers::call("TO_NUMBER", &[&helpers::call("TO_CHAR", &[at, &helpers::text("SS")])])
        };
        // TRUNC(.., 'IW') starts on Monday; shifting a day makes Sunday the boundary.
        let week_start = |at: &TokenStream| {
            trunc(&helpers::binary(at, Token::Plus, &helpers::int(1)), "IW")
        };

        Ok(match unit {
            DateUnit::Year => minus(
                helpers::extract("YEAR", end),
                helpers::extract("YEAR", start),
            ),
            DateUnit::Quarter => helpers::binary(&months("Q"), Token::Div, &helpers::int(3)),
            DateUnit::Month => months("MM"),
            DateUnit::DayOfYear | DateUnit::Day => minus(
                helpers::call("TRUNC", &[end]),
                helpers::call("TRUNC", &[start]),
            ),
            DateUnit::Week => helpers::binary(
                &minus(week_start(end), week_start(start)),
                Token::Div,
                &helpers::int(7),
            ),
            DateUnit::Hour => scaled("HH24", 24),
            DateUnit::Minute => scaled("MI", 1440),
            DateUnit::Second => helpers::binary(
                &helpers::binary(&scaled("MI", 1440), Token::Mul, &helpers::int(60)),
                Token::Plus,
                &minus(second_of_minute(end), second_of_minute(start)),
            ),
            DateUnit::Millisecond | DateUnit::Microsecond | DateUnit::Nanosecond => {
                return Err(Error::unsupported(
                    format!("{} date difference", unit.keyword().to_lowercase()),
                    self.name(),
                ))
            }
        })
    }

    fn emit_bitwise_and(&self, left: &TokenStream, right: &TokenStream) -> TokenStream {
        helpers::call("BITAND", &[left, right])
    }

    fn paging_strategy(&self) -> PagingStrategy {
        PagingStrategy::RowNumberWrapper
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_fetch(limit, offset)
    }

    fn table_alias_keyword(&self) -> bool {
        false
    }

    fn supports_multi_row_values(&self) -> bool {
        false
    }
}
