//! SELECT and UNION rendering across dialects.

#[path = "../common/mod.rs"]
mod common;

use common::{assert_parses_everywhere, validate_sql};
use insta::assert_snapshot;
use sqlom::prelude::*;
use sqlom::sql::{JoinCondition, UnionModifier};
use sqlom::ValidationError;

fn customers_with_orders() -> SelectQuery {
    SelectQuery::new()
        .column(table_col("c", "name"))
        .column_as(count(table_col("o", "id")), "orders")
        .from(FromTerm::table("customers").with_alias("c"))
        .join(Join::new(
            JoinType::Left,
            FromTerm::table("orders").with_alias("o"),
            JoinCondition::Clause(
                WhereClause::and()
                    .term(table_col("o", "customer_id").eq(table_col("c", "id")))
                    .term(table_col("o", "status").ne("void")),
            ),
        ))
        .group_by(GroupByTerm::new("name").table("c"))
        .order_by(OrderByTerm::desc("name").table("c"))
}

#[test]
fn test_nested_where_clause() {
    let query = SelectQuery::new()
        .from(FromTerm::table("customers"))
        .where_clause(
            WhereClause::and()
                .term(col("active").eq(true))
                .clause(
                    WhereClause::or()
                        .term(col("city").eq("Paris"))
                        .term(col("city").eq("Rome")),
                ),
        );

    let sql = query.to_sql(Dialect::SqlServer).unwrap();
    assert_snapshot!(sql, @"SELECT * FROM [customers] WHERE [active] = 1 AND ([city] = 'Paris' OR [city] = 'Rome')");
    validate_sql(&sql, Dialect::SqlServer).unwrap();

    assert_eq!(
        query.to_sql(Dialect::Postgres).unwrap(),
        "SELECT * FROM \"customers\" WHERE \"active\" = TRUE AND (\"city\" = 'Paris' OR \"city\" = 'Rome')"
    );
}

#[test]
fn test_left_join_with_clause() {
    let sql = customers_with_orders().to_sql(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"SELECT "c"."name", COUNT("o"."id") AS "orders" FROM "customers" AS "c" LEFT JOIN "orders" AS "o" ON "o"."customer_id" = "c"."id" AND "o"."status" <> 'void' GROUP BY "c"."name" ORDER BY "c"."name" DESC"#);
    assert_parses_everywhere(|d| customers_with_orders().to_sql(d).unwrap());
}

#[test]
fn test_oracle_omits_table_alias_keyword() {
    let query = SelectQuery::new()
        .column(table_col("c", "name"))
        .from(FromTerm::table("customers").with_alias("c"));
    assert_eq!(
        query.to_sql(Dialect::Oracle).unwrap(),
        "SELECT \"c\".\"name\" FROM \"customers\" \"c\""
    );
}

#[test]
fn test_full_outer_join_support() {
    let query = SelectQuery::new()
        .from(FromTerm::table("a").with_alias("a"))
        .join(Join::on_fields(
            JoinType::Full,
            FromTerm::table("b").with_alias("b"),
            "a",
            &[("id", "a_id")],
        ));

    assert_eq!(
        query.to_sql(Dialect::SqlServer).unwrap(),
        "SELECT * FROM [a] AS [a] FULL OUTER JOIN [b] AS [b] ON [a].[id] = [b].[a_id]"
    );
    assert!(matches!(
        query.to_sql(Dialect::MySql),
        Err(Error::UnsupportedFeature { .. })
    ));
}

#[test]
fn test_subquery_predicates() {
    let vip = SelectQuery::new()
        .column(col("customer_id"))
        .from(FromTerm::table("vip"));
    let open_orders = SelectQuery::new()
        .column(lit(1))
        .from(FromTerm::table("orders").with_alias("o"))
        .filter(table_col("o", "customer_id").eq(table_col("c", "id")));

    let query = SelectQuery::new()
        .column(table_col("c", "id"))
        .from(FromTerm::table("customers").with_alias("c"))
        .filter(table_col("c", "id").in_query(vip))
        .filter(WhereTerm::not_exists(open_orders));

    let sql = query.to_sql(Dialect::MySql).unwrap();
    assert_snapshot!(sql, @"SELECT `c`.`id` FROM `customers` AS `c` WHERE `c`.`id` IN (SELECT `customer_id` FROM `vip`) AND NOT EXISTS (SELECT 1 FROM `orders` AS `o` WHERE `o`.`customer_id` = `c`.`id`)");
    validate_sql(&sql, Dialect::MySql).unwrap();
}

#[test]
fn test_derived_table_and_cross_join() {
    let totals = SelectQuery::new()
        .column(col("region"))
        .column_as(sum(col("amount")), "total")
        .from(FromTerm::table("sales"))
        .group_by("region");

    let query = SelectQuery::new()
        .from(FromTerm::subquery(totals, "t"))
        .join(Join::cross(FromTerm::table("calendar").with_alias("cal")));

    let sql = query.to_sql(Dialect::SqlServer).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM (SELECT [region], SUM([amount]) AS [total] FROM [sales] GROUP BY [region]) AS [t] \
         CROSS JOIN [calendar] AS [cal]"
    );
    validate_sql(&sql, Dialect::SqlServer).unwrap();
}

#[test]
fn test_table_space_applies_to_unqualified_tables() {
    let query = SelectQuery::new()
        .from(FromTerm::table("customers").with_alias("c"))
        .join(Join::on_fields(
            JoinType::Inner,
            FromTerm::table_in("audit", "changes").with_alias("a"),
            "c",
            &[("id", "row_id")],
        ))
        .table_space("crm");

    assert_eq!(
        query.to_sql(Dialect::Postgres).unwrap(),
        "SELECT * FROM \"crm\".\"customers\" AS \"c\" \
         INNER JOIN \"audit\".\"changes\" AS \"a\" ON \"c\".\"id\" = \"a\".\"row_id\""
    );
}

#[test]
fn test_union_all_renders_for_every_dialect() {
    let union = || {
        SqlUnion::new()
            .union(SelectQuery::new().column(col("email")).from(FromTerm::table("customers")))
            .add(
                SelectQuery::new().column(col("email")).from(FromTerm::table("leads")),
                UnionModifier::All,
            )
    };

    assert_snapshot!(
        union().to_sql(Dialect::SqlServer).unwrap(),
        @"SELECT [email] FROM [customers] UNION ALL SELECT [email] FROM [leads]"
    );
    assert_parses_everywhere(|d| union().to_sql(d).unwrap());
}

#[test]
fn test_union_rejects_ordered_members() {
    let ordered = SelectQuery::new()
        .from(FromTerm::table("a"))
        .order_by(OrderByTerm::new("id"));
    let union = SqlUnion::new()
        .union(SelectQuery::new().from(FromTerm::table("b")))
        .union(ordered);

    assert_eq!(
        union.to_sql(Dialect::Postgres).unwrap_err(),
        Error::InvalidQuery(ValidationError::UnionMemberOrdered { index: 1 })
    );
}

#[test]
fn test_missing_from_is_rejected() {
    let query = SelectQuery::new().column(col("id"));
    assert_eq!(
        query.to_sql(Dialect::MySql).unwrap_err(),
        Error::InvalidQuery(ValidationError::MissingFrom)
    );
}
