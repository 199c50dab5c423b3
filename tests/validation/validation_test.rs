use sqlom::prelude::*;
use sqlom::sql::{FromClause, JoinCondition};
use sqlom::ValidationError;

fn tag(id: i64, label: &str) -> InsertQuery {
    InsertQuery::into("tags").set("id", id).set("label", label)
}

#[test]
fn test_valid_bulk_insert() {
    let bulk = BulkInsertQuery::new().row(tag(1, "a")).row(tag(2, "b"));
    assert!(bulk.validate().is_ok());
}

#[test]
fn test_empty_bulk_insert() {
    assert_eq!(
        BulkInsertQuery::new().validate(),
        Err(ValidationError::EmptyBulkInsert)
    );
    assert_eq!(
        BulkInsertQuery::new().to_sql(Dialect::SqlServer).unwrap_err(),
        Error::InvalidQuery(ValidationError::EmptyBulkInsert)
    );
}

#[test]
fn test_bulk_insert_rows_must_share_table() {
    let bulk = BulkInsertQuery::new()
        .row(tag(1, "a"))
        .row(InsertQuery::into("labels").set("id", 2).set("label", "b"));
    assert_eq!(
        bulk.validate(),
        Err(ValidationError::BulkInsertTableMismatch {
            expected: "tags".into(),
            found: "labels".into(),
        })
    );
}

#[test]
fn test_bulk_insert_rows_must_share_namespace() {
    let bulk = BulkInsertQuery::new()
        .row(tag(1, "a").namespace("sales"))
        .row(tag(2, "b").namespace("archive"));
    assert_eq!(
        bulk.validate(),
        Err(ValidationError::BulkInsertTableMismatch {
            expected: "sales.tags".into(),
            found: "archive.tags".into(),
        })
    );

    let mixed = BulkInsertQuery::new()
        .row(tag(1, "a").namespace("sales"))
        .row(tag(2, "b"));
    assert_eq!(
        mixed.to_sql(Dialect::Postgres).unwrap_err(),
        Error::InvalidQuery(ValidationError::BulkInsertTableMismatch {
            expected: "sales.tags".into(),
            found: "tags".into(),
        })
    );

    let same = BulkInsertQuery::new()
        .row(tag(1, "a").namespace("sales"))
        .row(tag(2, "b").namespace("sales"));
    assert!(same.validate().is_ok());
}

#[test]
fn test_bulk_insert_rows_must_share_fields() {
    let bulk = BulkInsertQuery::new()
        .row(tag(1, "a"))
        .row(tag(2, "b"))
        .row(InsertQuery::into("tags").set("id", 3));
    assert_eq!(
        bulk.validate(),
        Err(ValidationError::BulkInsertFieldMismatch { row: 2 })
    );

    // same set, different order
    let reordered = BulkInsertQuery::new()
        .row(tag(1, "a"))
        .row(InsertQuery::into("tags").set("label", "b").set("id", 2));
    assert!(reordered.validate().is_ok());
}

#[test]
fn test_bulk_insert_values_must_be_constant() {
    let bulk = BulkInsertQuery::new()
        .row(tag(1, "a"))
        .row(InsertQuery::into("tags").set("id", param("next")).set("label", "b"));
    assert_eq!(
        bulk.validate(),
        Err(ValidationError::NonConstantValue { field: "id".into() })
    );
}

#[test]
fn test_insert_and_update_checks() {
    assert_eq!(
        InsertQuery::into("t").validate(),
        Err(ValidationError::EmptyInsert)
    );
    assert_eq!(
        InsertQuery::into("t").set("a", 1).set("a", 2).validate(),
        Err(ValidationError::DuplicateField("a".into()))
    );
    assert_eq!(
        UpdateQuery::table("t").filter(col("id").eq(1)).validate(),
        Err(ValidationError::EmptyUpdate)
    );
    assert_eq!(
        DeleteQuery::from("").validate(),
        Err(ValidationError::EmptyTableName)
    );
}

#[test]
fn test_join_checks() {
    let base = || SelectQuery::new().from(FromTerm::table("customers").with_alias("c"));

    let unaliased = base().join(Join::on_fields(
        JoinType::Inner,
        FromTerm::table("orders"),
        "c",
        &[("id", "customer_id")],
    ));
    assert_eq!(
        unaliased.validate(),
        Err(ValidationError::MissingAlias {
            context: "join target"
        })
    );

    let forward_reference = base().join(Join::on_fields(
        JoinType::Inner,
        FromTerm::table("orders").with_alias("o"),
        "x",
        &[("id", "customer_id")],
    ));
    assert_eq!(
        forward_reference.validate(),
        Err(ValidationError::UnknownJoinTable("x".into()))
    );

    let no_pairs = base().join(Join::on_fields(
        JoinType::Left,
        FromTerm::table("orders").with_alias("o"),
        "c",
        &[],
    ));
    assert_eq!(no_pairs.validate(), Err(ValidationError::EmptyJoinCondition));

    let conditionless = base().join(Join::new(
        JoinType::Left,
        FromTerm::table("orders").with_alias("o"),
        JoinCondition::None,
    ));
    assert_eq!(
        conditionless.validate(),
        Err(ValidationError::MissingJoinCondition(JoinType::Left))
    );

    let conditioned_cross = base().join(Join::new(
        JoinType::Cross,
        FromTerm::table("orders").with_alias("o"),
        JoinCondition::Clause(WhereClause::and().term(col("x").eq(1))),
    ));
    assert_eq!(
        conditioned_cross.validate(),
        Err(ValidationError::UnexpectedJoinCondition)
    );
}

#[test]
fn test_joins_may_reference_earlier_joins() {
    let query = SelectQuery::new()
        .from(FromTerm::table("customers").with_alias("c"))
        .join(Join::on_fields(
            JoinType::Inner,
            FromTerm::table("orders").with_alias("o"),
            "c",
            &[("id", "customer_id")],
        ))
        .join(Join::on_fields(
            JoinType::Inner,
            FromTerm::table("lines").with_alias("l"),
            "o",
            &[("id", "order_id")],
        ));
    assert!(query.validate().is_ok());
}

#[test]
fn test_subquery_needs_alias() {
    let inner = SelectQuery::new().from(FromTerm::table("t"));
    let mut query = SelectQuery::new();
    query.from = FromClause::new(FromTerm::subquery(inner, "x"));
    assert!(query.validate().is_ok());

    query.from.base.as_mut().unwrap().alias = None;
    assert_eq!(
        query.validate(),
        Err(ValidationError::MissingAlias { context: "subquery" })
    );
}

#[test]
fn test_group_modifier_requires_group_by() {
    let query = SelectQuery::new().from(FromTerm::table("t")).with_cube();
    assert_eq!(
        query.validate(),
        Err(ValidationError::GroupModifierWithoutGroupBy)
    );
}

#[test]
fn test_case_checks() {
    let empty = SelectQuery::new()
        .from(FromTerm::table("t"))
        .column(case_when(vec![], Some(lit(0))));
    assert_eq!(empty.validate(), Err(ValidationError::EmptyCase));

    let blank_condition = SelectQuery::new()
        .from(FromTerm::table("t"))
        .column(case_when(vec![(WhereClause::and(), lit(1))], None));
    assert_eq!(
        blank_condition.validate(),
        Err(ValidationError::EmptyCaseCondition)
    );
}

#[test]
fn test_statement_dispatch() {
    let statement = Statement::from(SqlUnion::new());
    assert_eq!(statement.validate(), Err(ValidationError::EmptyUnion));
    assert_eq!(
        statement.to_sql(Dialect::Postgres).unwrap_err().to_string(),
        "invalid query: union has no members"
    );
}
