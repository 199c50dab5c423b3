//! INSERT, bulk INSERT, UPDATE and DELETE rendering.

#[path = "../common/mod.rs"]
mod common;

use common::{assert_parses_everywhere, validate_sql};
use insta::assert_snapshot;
use sqlom::prelude::*;

#[test]
fn test_insert_for_every_dialect() {
    let insert = || {
        InsertQuery::into("customers")
            .set("name", "O'Brien")
            .set("active", true)
            .set("score", 42)
    };

    assert_snapshot!(
        insert().to_sql(Dialect::SqlServer).unwrap(),
        @"INSERT INTO [customers] ([name], [active], [score]) VALUES ('O''Brien', 1, 42)"
    );
    assert_eq!(
        insert().to_sql(Dialect::Postgres).unwrap(),
        "INSERT INTO \"customers\" (\"name\", \"active\", \"score\") VALUES ('O''Brien', TRUE, 42)"
    );
    assert_parses_everywhere(|d| insert().to_sql(d).unwrap());
}

#[test]
fn test_insert_with_parameters() {
    let insert = InsertQuery::into("audit")
        .set("user_id", param("user"))
        .set("email", func("LOWER", vec![param("email")]));
    assert_eq!(
        insert.to_sql(Dialect::Oracle).unwrap(),
        "INSERT INTO \"audit\" (\"user_id\", \"email\") VALUES (:user, LOWER(:email))"
    );
}

#[test]
fn test_bulk_insert_multi_row() {
    let bulk = BulkInsertQuery::new()
        .row(InsertQuery::into("tags").set("id", 1).set("label", "red"))
        .row(InsertQuery::into("tags").set("id", 2).set("label", "blue"))
        .row(InsertQuery::into("tags").set("label", "green").set("id", 3));

    let sql = bulk.to_sql(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"INSERT INTO "tags" ("id", "label") VALUES (1, 'red'), (2, 'blue'), (3, 'green')"#);
    validate_sql(&sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_bulk_insert_oracle_select_from_dual() {
    let bulk = BulkInsertQuery::new()
        .row(InsertQuery::into("tags").set("id", 1).set("label", "red"))
        .row(InsertQuery::into("tags").set("id", 2).set("label", null()));

    assert_eq!(
        bulk.to_sql(Dialect::Oracle).unwrap(),
        "INSERT INTO \"tags\" (\"id\", \"label\") \
         SELECT 1, 'red' FROM DUAL UNION ALL SELECT 2, NULL FROM DUAL"
    );
}

#[test]
fn test_update_with_namespace_and_clause() {
    let update = UpdateQuery::table("accounts")
        .namespace("billing")
        .set("balance", col("balance").sub(col("pending")))
        .set("pending", 0)
        .where_clause(
            WhereClause::or()
                .term(col("closed_at").is_null())
                .term(col("flags").has_flags(4)),
        );

    let sql = update.to_sql(Dialect::SqlServer).unwrap();
    assert_snapshot!(sql, @"UPDATE [billing].[accounts] SET [balance] = ([balance] - [pending]), [pending] = 0 WHERE [closed_at] IS NULL OR ([flags] & 4) <> 0");
    validate_sql(&sql, Dialect::SqlServer).unwrap();

    assert!(update
        .to_sql(Dialect::Oracle)
        .unwrap()
        .ends_with("OR BITAND(\"flags\", 4) <> 0"));
}

#[test]
fn test_delete_with_in_list() {
    let delete = DeleteQuery::from("sessions").filter(
        col("state").in_list(vec![Constant::from("expired"), Constant::from("revoked")]),
    );

    let sql = delete.to_sql(Dialect::MySql).unwrap();
    assert_eq!(
        sql,
        "DELETE FROM `sessions` WHERE `state` IN ('expired', 'revoked')"
    );
    validate_sql(&sql, Dialect::MySql).unwrap();
}

#[test]
fn test_delete_with_empty_in_list_matches_nothing() {
    let delete = DeleteQuery::from("sessions").filter(col("id").in_list(vec![]));
    assert_eq!(
        delete.to_sql(Dialect::Postgres).unwrap(),
        "DELETE FROM \"sessions\" WHERE 1 = 0"
    );
}

#[test]
fn test_statement_from_json() {
    let json = r#"{
        "update": {
            "table": "users",
            "terms": [{ "field": "name", "value": { "constant": { "kind": "string", "value": "Ada" } } }],
            "where_clause": {
                "terms": [{ "compare": {
                    "left": { "field": { "name": "id" } },
                    "op": "equal",
                    "right": { "constant": { "kind": "number", "value": 7 } }
                } }]
            }
        }
    }"#;

    let statement: Statement = serde_json::from_str(json).unwrap();
    assert_eq!(statement.kind(), "update");
    assert_eq!(
        statement.to_sql(Dialect::MySql).unwrap(),
        "UPDATE `users` SET `name` = 'Ada' WHERE `id` = 7"
    );
}
