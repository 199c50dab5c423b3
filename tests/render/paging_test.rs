//! Paging: native LIMIT/OFFSET and the ROW_NUMBER() rewrite.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use insta::assert_snapshot;
use sqlom::prelude::*;
use sqlom::sql::paging::{ROW_FILTER, ROW_NUMBER};
use sqlom::sql::render;
use sqlom::ValidationError;

fn customers_page(page_index: u64) -> SelectQuery {
    SelectQuery::new()
        .column(col("name"))
        .from(FromTerm::table("customers"))
        .order_by(OrderByTerm::new("name"))
        .page(page_index, 10)
}

#[test]
fn test_first_page_keeps_offset_zero() {
    let sql = customers_page(0).to_sql(Dialect::MySql).unwrap();
    assert_snapshot!(sql, @"SELECT `name` FROM `customers` ORDER BY `name` ASC LIMIT 10 OFFSET 0");
    validate_sql(&sql, Dialect::MySql).unwrap();
}

#[test]
fn test_postgres_third_page() {
    let sql = customers_page(2).to_sql(Dialect::Postgres).unwrap();
    assert_eq!(
        sql,
        "SELECT \"name\" FROM \"customers\" ORDER BY \"name\" ASC LIMIT 10 OFFSET 20"
    );
    validate_sql(&sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_page_past_top_is_empty() {
    let sql = customers_page(3).top(25).to_sql(Dialect::MySql).unwrap();
    assert_eq!(
        sql,
        "SELECT `name` FROM `customers` ORDER BY `name` ASC LIMIT 0 OFFSET 30"
    );
}

#[test]
fn test_sqlserver_row_number_rewrite() {
    let sql = customers_page(0).to_sql(Dialect::SqlServer).unwrap();
    assert_snapshot!(sql, @"SELECT [wrapperRowFilter].[name] FROM (SELECT [wrapper].*, ROW_NUMBER() OVER (ORDER BY [wrapper].[name] ASC) AS [ROW_NUMBER] FROM (SELECT [name] FROM [customers]) AS [wrapper]) AS [wrapperRowFilter] WHERE [wrapperRowFilter].[ROW_NUMBER] BETWEEN 1 AND 10 ORDER BY [wrapperRowFilter].[name] ASC");
    validate_sql(&sql, Dialect::SqlServer).unwrap();
}

#[test]
fn test_oracle_row_number_rewrite() {
    let sql = customers_page(1).to_sql(Dialect::Oracle).unwrap();
    assert_eq!(
        sql,
        "SELECT \"wrapperRowFilter\".\"name\" FROM \
         (SELECT \"wrapper\".*, ROW_NUMBER() OVER (ORDER BY \"wrapper\".\"name\" ASC) AS \"ROW_NUMBER\" FROM \
         (SELECT \"name\" FROM \"customers\") \"wrapper\") \"wrapperRowFilter\" \
         WHERE \"wrapperRowFilter\".\"ROW_NUMBER\" BETWEEN 11 AND 20 \
         ORDER BY \"wrapperRowFilter\".\"name\" ASC"
    );
}

#[test]
fn test_order_on_unselected_column() {
    let query = SelectQuery::new()
        .column(col("name"))
        .column(count_star())
        .from(FromTerm::table("customers"))
        .group_by("name")
        .group_by("created_at")
        .order_by(OrderByTerm::new("created_at"))
        .page(1, 10);

    let sql = query.to_sql(Dialect::SqlServer).unwrap();
    assert_snapshot!(sql, @"SELECT [wrapperRowFilter].[name], [wrapperRowFilter].[col2] FROM (SELECT [wrapper].*, ROW_NUMBER() OVER (ORDER BY [wrapper].[created_at] ASC) AS [ROW_NUMBER] FROM (SELECT [name], COUNT(*) AS [col2], [created_at] FROM [customers] GROUP BY [name], [created_at]) AS [wrapper]) AS [wrapperRowFilter] WHERE [wrapperRowFilter].[ROW_NUMBER] BETWEEN 11 AND 20 ORDER BY [wrapperRowFilter].[created_at] ASC");
    validate_sql(&sql, Dialect::SqlServer).unwrap();

    // native paging sorts on the base table directly
    assert_eq!(
        query.to_sql(Dialect::Postgres).unwrap(),
        "SELECT \"name\", COUNT(*) FROM \"customers\" GROUP BY \"name\", \"created_at\" \
         ORDER BY \"created_at\" ASC LIMIT 10 OFFSET 10"
    );
}

#[test]
fn test_paging_entry_point_per_dialect() {
    let query = customers_page(4);

    let native = render::paging(&query, Dialect::Postgres).unwrap();
    assert_eq!(native, query);

    let wrapped = render::paging(&query, Dialect::SqlServer).unwrap();
    assert!(wrapped.paging.is_none());
    assert_eq!(wrapped.order_by[0].table.as_deref(), Some(ROW_FILTER));
    assert_eq!(
        wrapped.where_clause.terms[0],
        table_col(ROW_FILTER, ROW_NUMBER).between(41, 50)
    );
}

#[test]
fn test_paging_requires_order() {
    let query = SelectQuery::new().from(FromTerm::table("customers")).page(0, 10);
    for dialect in Dialect::ALL {
        assert_eq!(
            query.to_sql(dialect).unwrap_err(),
            Error::InvalidQuery(ValidationError::PagingWithoutOrder)
        );
    }
}

#[test]
fn test_zero_page_size_is_rejected() {
    let query = customers_page(0).page(0, 0);
    assert_eq!(
        query.to_sql(Dialect::Postgres).unwrap_err(),
        Error::InvalidQuery(ValidationError::InvalidPageSize)
    );
}

#[test]
fn test_row_count_ignores_paging() {
    let query = customers_page(2);
    let sql = render::render_row_count(&query, Dialect::SqlServer).unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(*) AS [cnt] FROM (SELECT [name] FROM [customers]) AS [t]"
    );
    validate_sql(&sql, Dialect::SqlServer).unwrap();
}
