//! Helpers shared by the integration tests.

#![allow(dead_code)]

use sqlom::Dialect;
use sqlparser::dialect::{GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

/// Parse `sql` back with sqlparser-rs for the matching grammar.
///
/// Oracle output goes through the generic grammar.
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::SqlServer => Box::new(MsSqlDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::Oracle => Box::new(GenericDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))
}

/// Render for every dialect that sqlparser understands and check each parses.
pub fn assert_parses_everywhere(render: impl Fn(Dialect) -> String) {
    for dialect in [Dialect::SqlServer, Dialect::MySql, Dialect::Postgres] {
        let sql = render(dialect);
        validate_sql(&sql, dialect).unwrap();
    }
}
