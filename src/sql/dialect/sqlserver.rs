//! SQL Server (T-SQL) dialect.
//!
//! - Square bracket identifier quoting (`[name]`)
//! - N'...' prefix for Unicode strings
//! - `0x..` binary literals
//! - TOP for simple limiting, ROW_NUMBER() wrapping for paging
//! - `GROUP BY ... WITH CUBE | WITH ROLLUP`
//! - DATEDIFF for every date unit (boundary counts, Sunday weeks regardless of DATEFIRST)

use super::{helpers, GroupModifierStyle, PagingStrategy, SqlDialect, TopPlacement};
use crate::error::Result;
use crate::sql::expr::DateUnit;
use crate::sql::token::{Token, TokenStream};

/// SQL Server dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlServer;

impl SqlDialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        if s.is_ascii() {
            helpers::quote_string_single(s)
        } else {
            helpers::quote_string_unicode(s)
        }
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        format!("0x{}", helpers::hex_upper(bytes))
    }

    fn null_coalesce_function(&self) -> &'static str {
        "ISNULL"
    }

    fn emit_date_diff(
        &self,
        unit: DateUnit,
        start: &TokenStream,
        end: &TokenStream,
    ) -> Result<TokenStream> {
        let unit: TokenStream = Token::Raw(unit.keyword().into()).into();
        Ok(helpers::call("DATEDIFF", &[&unit, start, end]))
    }

    fn paging_strategy(&self) -> PagingStrategy {
        PagingStrategy::RowNumberWrapper
    }

    fn top_placement(&self) -> TopPlacement {
        TopPlacement::Prefix
    }

    fn group_modifier_style(&self) -> GroupModifierStyle {
        GroupModifierStyle::Suffix
    }
}
