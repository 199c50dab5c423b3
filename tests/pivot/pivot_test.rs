//! Cross-tab queries end to end.

#[path = "../common/mod.rs"]
mod common;

use common::{assert_parses_everywhere, validate_sql};
use insta::assert_snapshot;
use sqlom::pivot::{PivotMatch, PivotValue};
use sqlom::prelude::*;

fn age_bands() -> PivotTable {
    PivotTable::new(
        FromTerm::table("patients"),
        AggregateFunction::Count,
        "id",
        "ward",
    )
    .column(
        PivotColumn::new("age", DataKind::Number)
            .range("child", None, Some(18.into()))
            .range("adult", Some(18.into()), Some(65.into()))
            .range("senior", Some(65.into()), None),
    )
}

#[test]
fn test_range_pivot() {
    let sql = age_bands().build().unwrap().to_sql(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"SELECT "ward", COUNT(CASE WHEN "age" < 18 THEN "id" ELSE NULL END) AS "child", COUNT(CASE WHEN "age" >= 18 AND "age" < 65 THEN "id" ELSE NULL END) AS "adult", COUNT(CASE WHEN "age" >= 65 THEN "id" ELSE NULL END) AS "senior" FROM "patients" GROUP BY "ward" ORDER BY "ward" ASC"#);
    validate_sql(&sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_pivot_parses_on_every_dialect() {
    let pivot = PivotTable::new(
        FromTerm::table("sales").with_alias("s"),
        AggregateFunction::Sum,
        "amount",
        "region",
    )
    .column(
        PivotColumn::new("channel", DataKind::String)
            .value("web", "web")
            .value("store", "store"),
    )
    .total("all_channels");

    assert_parses_everywhere(|d| pivot.build().unwrap().to_sql(d).unwrap());
    assert_eq!(
        pivot.output_names().collect::<Vec<_>>(),
        vec!["region", "web", "store", "all_channels"]
    );
}

#[test]
fn test_drill_down_on_range() {
    let sql = age_bands()
        .build_drill_down(Some(Constant::from("East")), "adult")
        .unwrap()
        .to_sql(Dialect::SqlServer)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM [patients] WHERE [ward] = 'East' AND [age] >= 18 AND [age] < 65"
    );
    validate_sql(&sql, Dialect::SqlServer).unwrap();
}

#[test]
fn test_pivot_over_subquery() {
    let recent = SelectQuery::new()
        .from(FromTerm::table("sales"))
        .filter(col("year").gte(2020));
    let pivot = PivotTable::new(
        FromTerm::subquery(recent, "recent"),
        AggregateFunction::Max,
        "amount",
        "region",
    )
    .column(PivotColumn::new("year", DataKind::Number).value("y2024", 2024));

    assert_eq!(
        pivot.build().unwrap().to_sql(Dialect::MySql).unwrap(),
        "SELECT `region`, MAX(CASE WHEN `year` = 2024 THEN `amount` ELSE NULL END) AS `y2024` \
         FROM (SELECT * FROM `sales` WHERE `year` >= 2020) AS `recent` \
         GROUP BY `region` ORDER BY `region` ASC"
    );
}

#[test]
fn test_pivot_from_json() {
    let json = r#"{
        "base": { "source": { "table": { "name": "sales" } } },
        "function": "sum",
        "value_field": "amount",
        "row_field": "region",
        "columns": [{
            "field": "year",
            "kind": "number",
            "values": [
                { "name": "y2023", "matcher": { "scalar": { "kind": "number", "value": 2023 } } }
            ]
        }]
    }"#;

    let pivot: PivotTable = serde_json::from_str(json).unwrap();
    assert_eq!(
        pivot.columns[0].values[0],
        PivotValue {
            name: "y2023".into(),
            matcher: PivotMatch::Scalar(Constant::from(2023)),
        }
    );
    assert_eq!(
        pivot.build().unwrap().to_sql(Dialect::SqlServer).unwrap(),
        "SELECT [region], SUM(CASE WHEN [year] = 2023 THEN [amount] ELSE NULL END) AS [y2023] \
         FROM [sales] GROUP BY [region] ORDER BY [region] ASC"
    );
}

#[test]
fn test_invalid_pivot_does_not_build() {
    let pivot = PivotTable::new(FromTerm::table("t"), AggregateFunction::Sum, "v", "r");
    assert!(matches!(
        pivot.build(),
        Err(Error::InvalidQuery(sqlom::ValidationError::PivotWithoutColumns))
    ));
}
