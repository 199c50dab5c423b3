//! Typed constants and dialect-specific functions inside full statements.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use insta::assert_snapshot;
use rust_decimal::Decimal;
use sqlom::prelude::*;
use sqlom::sql::Number;
use uuid::Uuid;

fn where_sql(term: WhereTerm, dialect: Dialect) -> String {
    SelectQuery::new()
        .from(FromTerm::table("t"))
        .filter(term)
        .to_sql(dialect)
        .unwrap()
}

#[test]
fn test_dates_per_dialect() {
    let day = Constant::date(2024, 1, 15).unwrap();
    let term = || col("created").gte(day.clone());

    assert_eq!(
        where_sql(term(), Dialect::SqlServer),
        "SELECT * FROM [t] WHERE [created] >= '2024-01-15'"
    );
    assert_eq!(
        where_sql(term(), Dialect::MySql),
        "SELECT * FROM `t` WHERE `created` >= '2024-01-15'"
    );
    assert_eq!(
        where_sql(term(), Dialect::Postgres),
        "SELECT * FROM \"t\" WHERE \"created\" >= DATE '2024-01-15'"
    );
    assert_eq!(
        where_sql(term(), Dialect::Oracle),
        "SELECT * FROM \"t\" WHERE \"created\" >= DATE '2024-01-15'"
    );
}

#[test]
fn test_timestamps_keep_time_of_day() {
    let at = Constant::date_time(2024, 1, 15, 10, 30, 0).unwrap();
    assert_snapshot!(
        where_sql(col("created").lt(at.clone()), Dialect::SqlServer),
        @"SELECT * FROM [t] WHERE [created] < '2024-01-15 10:30:00'"
    );
    assert_eq!(
        where_sql(col("created").lt(at), Dialect::Oracle),
        "SELECT * FROM \"t\" WHERE \"created\" < TIMESTAMP '2024-01-15 10:30:00'"
    );
}

#[test]
fn test_unicode_strings_on_sqlserver() {
    let sql = where_sql(col("name").eq("Zoë"), Dialect::SqlServer);
    assert_eq!(sql, "SELECT * FROM [t] WHERE [name] = N'Zoë'");
    assert_eq!(
        where_sql(col("name").eq("Zoë"), Dialect::MySql),
        "SELECT * FROM `t` WHERE `name` = 'Zoë'"
    );
}

#[test]
fn test_numbers() {
    let price: Decimal = "19.990".parse().unwrap();
    let sql = where_sql(
        col("price").between(Constant::from(price), Constant::float(25.5).unwrap()),
        Dialect::Postgres,
    );
    assert_eq!(
        sql,
        "SELECT * FROM \"t\" WHERE \"price\" BETWEEN 19.990 AND 25.5"
    );
    validate_sql(&sql, Dialect::Postgres).unwrap();

    assert!(Constant::float(f64::NAN).is_err());
}

#[test]
fn test_non_finite_number_fails_validation() {
    let bad = Constant::Number(Number::Float(f64::INFINITY));
    let query = SelectQuery::new()
        .from(FromTerm::table("t"))
        .filter(col("x").eq(bad));
    assert_eq!(
        query.to_sql(Dialect::MySql).unwrap_err(),
        Error::InvalidQuery(sqlom::ValidationError::NonFiniteNumber)
    );
}

#[test]
fn test_binary_and_guid() {
    let guid = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();
    let query = SelectQuery::new()
        .from(FromTerm::table("blobs"))
        .filter(col("hash").eq(Constant::from(vec![0xca_u8, 0xfe])))
        .filter(col("owner").eq(Constant::from(guid)));

    assert_eq!(
        query.to_sql(Dialect::SqlServer).unwrap(),
        "SELECT * FROM [blobs] WHERE [hash] = 0xCAFE AND [owner] = '6f9619ff-8b86-d011-b42d-00c04fc964ff'"
    );
    assert_eq!(
        query.to_sql(Dialect::Oracle).unwrap(),
        "SELECT * FROM \"blobs\" WHERE \"hash\" = HEXTORAW('CAFE') AND \"owner\" = '6f9619ff-8b86-d011-b42d-00c04fc964ff'"
    );
}

#[test]
fn test_parsed_constants_render_like_built_ones() {
    assert_eq!(
        Constant::parse(DataKind::Date, "2024-01-15").unwrap(),
        Constant::date(2024, 1, 15).unwrap()
    );
    assert_eq!(
        Constant::parse(DataKind::Boolean, "1").unwrap(),
        Constant::from(true)
    );
    assert!(Constant::parse(DataKind::Number, "twelve").is_err());
}

#[test]
fn test_null_coalesce_per_dialect() {
    let query = || {
        SelectQuery::new()
            .column(if_null(col("nickname"), col("name")).alias("display"))
            .from(FromTerm::table("users"))
    };

    assert_eq!(
        query().to_sql(Dialect::SqlServer).unwrap(),
        "SELECT ISNULL([nickname], [name]) AS [display] FROM [users]"
    );
    assert_eq!(
        query().to_sql(Dialect::MySql).unwrap(),
        "SELECT IFNULL(`nickname`, `name`) AS `display` FROM `users`"
    );
    assert_eq!(
        query().to_sql(Dialect::Postgres).unwrap(),
        "SELECT COALESCE(\"nickname\", \"name\") AS \"display\" FROM \"users\""
    );
    assert_eq!(
        query().to_sql(Dialect::Oracle).unwrap(),
        "SELECT NVL(\"nickname\", \"name\") AS \"display\" FROM \"users\""
    );
}

#[test]
fn test_caller_functions_pass_through() {
    let query = SelectQuery::new()
        .column(func("ISNULL", vec![col("x")]).alias("missing"))
        .from(FromTerm::table("t"));

    assert_eq!(
        query.to_sql(Dialect::MySql).unwrap(),
        "SELECT ISNULL(`x`) AS `missing` FROM `t`"
    );
    assert_eq!(
        query.to_sql(Dialect::Oracle).unwrap(),
        "SELECT ISNULL(\"x\") AS \"missing\" FROM \"t\""
    );
    assert_eq!(
        query.to_sql(Dialect::Postgres).unwrap(),
        "SELECT ISNULL(\"x\") AS \"missing\" FROM \"t\""
    );
}

#[test]
fn test_date_diff_in_select() {
    let query = SelectQuery::new()
        .column(date_diff(DateUnit::Day, col("opened"), col("closed")).alias("days"))
        .from(FromTerm::table("tickets"));

    assert_eq!(
        query.to_sql(Dialect::SqlServer).unwrap(),
        "SELECT DATEDIFF(DAY, [opened], [closed]) AS [days] FROM [tickets]"
    );
    assert!(date_diff(DateUnit::Nanosecond, col("a"), col("b"))
        .to_tokens(Dialect::MySql)
        .is_err());
}

#[test]
fn test_year_difference_counts_year_boundaries() {
    let query = || {
        SelectQuery::new()
            .column(date_diff(DateUnit::Year, col("opened"), col("closed")).alias("years"))
            .from(FromTerm::table("tickets"))
    };

    assert_eq!(
        query().to_sql(Dialect::SqlServer).unwrap(),
        "SELECT DATEDIFF(YEAR, [opened], [closed]) AS [years] FROM [tickets]"
    );
    assert_eq!(
        query().to_sql(Dialect::MySql).unwrap(),
        "SELECT (TIMESTAMPDIFF(YEAR, '1000-01-01', `closed`) - TIMESTAMPDIFF(YEAR, '1000-01-01', `opened`)) \
         AS `years` FROM `tickets`"
    );
    assert_eq!(
        query().to_sql(Dialect::Postgres).unwrap(),
        "SELECT (DATE_PART('year', \"closed\") - DATE_PART('year', \"opened\")) AS \"years\" FROM \"tickets\""
    );
    assert_eq!(
        query().to_sql(Dialect::Oracle).unwrap(),
        "SELECT (EXTRACT(YEAR FROM \"closed\") - EXTRACT(YEAR FROM \"opened\")) AS \"years\" FROM \"tickets\""
    );
}

#[test]
fn test_parameters_per_dialect() {
    let term = || col("id").eq(param("id"));
    assert_eq!(
        where_sql(term(), Dialect::SqlServer),
        "SELECT * FROM [t] WHERE [id] = @id"
    );
    assert_eq!(
        where_sql(term(), Dialect::Postgres),
        "SELECT * FROM \"t\" WHERE \"id\" = :id"
    );
    // positional placeholders pass through for drivers that bind by index
    assert_eq!(
        where_sql(col("id").eq(param("$1")), Dialect::Postgres),
        "SELECT * FROM \"t\" WHERE \"id\" = $1"
    );
}
