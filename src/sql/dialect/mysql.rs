//! MySQL dialect.
//!
//! - Backtick identifier quoting
//! - `X'..'` binary literals
//! - LIMIT/OFFSET paging
//! - `WITH ROLLUP` only; no CUBE, no FULL OUTER JOIN
//! - Date differences from TIMESTAMPDIFF against a fixed anchor, microsecond resolution

use super::{helpers, GroupModifierStyle, SqlDialect};
use crate::error::{Error, Result};
use crate::sql::expr::DateUnit;
use crate::sql::token::{Token, TokenStream};

/// Earliest DATETIME MySQL supports; boundary indexes count from here.
const BOUNDARY_ANCHOR: &str = "1000-01-01";

/// MySQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        format!("X'{}'", helpers::hex_upper(bytes))
    }

    fn null_coalesce_function(&self) -> &'static str {
        "IFNULL"
    }

    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream> {
        // Whole units elapsed since a midnight on the first of January is the
        // boundary index of a timestamp; the difference of two indexes counts
        // the boundaries crossed between them.
        let anchor = helpers::text(BOUNDARY_ANCHOR);
        let index = |keyword: &str, at: &TokenStream| {
            let unit: TokenStream = Token::Raw(keyword.into()).into();
            helpers::call("TIMESTAMPDIFF", &[&unit, &anchor, at])
        };
        let crossed = |keyword: &str| {
            helpers::binary(&index(keyword, end), Token::Minus, &index(keyword, start))
        };
        // Weeks start on Sunday (DAYOFWEEK = 1).
        let week_index = |at: &TokenStream| {
            helpers::binary(
                &helpers::call("TO_DAYS", &[at]),
                Token::Minus,
                &helpers::call("DAYOFWEEK", &[at]),
            )
        };
        let milli_index = |at: &TokenStream| {
            helpers::binary(
                &index("MICROSECOND", at),
                Token::Raw("DIV".into()),
                &helpers::int(1000),
            )
        };

        Ok(match unit {
            DateUnit::Year => crossed("YEAR"),
            DateUnit::Quarter => crossed("QUARTER"),
            DateUnit::Month => crossed("MONTH"),
            DateUnit::DayOfYear | DateUnit::Day => helpers::call("DATEDIFF", &[end, start]),
            DateUnit::Week => helpers::binary(
                &helpers::binary(&week_index(end), Token::Minus, &week_index(start)),
                Token::Raw("DIV".into()),
                &helpers::int(7),
            ),
            DateUnit::Hour => crossed("HOUR"),
            DateUnit::Minute => crossed("MINUTE"),
            DateUnit::Second => crossed("SECOND"),
            DateUnit::Millisecond => {
                helpers::binary(&milli_index(end), Token::Minus, &milli_index(start))
            }
            DateUnit::Microsecond => {
                let unit: TokenStream = Token::Raw("MICROSECOND".into()).into();
                helpers::call("TIMESTAMPDIFF", &[&unit, start, end])
            }
            DateUnit::Nanosecond => {
                return Err(Error::unsupported("nanosecond date difference", self.name()))
            }
        })
    }

    fn group_modifier_style(&self) -> GroupModifierStyle {
        GroupModifierStyle::Suffix
    }

    fn supports_cube(&self) -> bool {
        false
    }

    fn supports_full_outer_join(&self) -> bool {
        false
    }
}
