//! Record mappings, alias sessions and configuration working together.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use sqlom::config::Settings;
use sqlom::prelude::*;
use std::io::Write;

fn registry() -> MappingRegistry {
    [
        TableMapping::new("Customer", "customers")
            .column("Id", "id")
            .column("Name", "full_name")
            .column("email", "email")
            .ignore("Orders"),
        TableMapping::new("Order", "orders")
            .column("Id", "id")
            .column("CustomerId", "customer_id"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_mapped_select_can_be_extended() {
    let registry = registry();
    let mut session = AliasSession::new();

    let customers = registry.select_all("Customer", &mut session).unwrap();
    let query = customers
        .join(Join::on_fields(
            JoinType::Inner,
            FromTerm::table("orders").with_alias(&session.next_alias("orders")),
            "c",
            &[("id", "customer_id")],
        ))
        .filter(table_col("c", "email").like("%@example.com"))
        .order_by(OrderByTerm::new("full_name").table("c"));

    let sql = query.to_sql(Dialect::MySql).unwrap();
    assert_eq!(
        sql,
        "SELECT `c`.`id` AS `Id`, `c`.`full_name` AS `Name`, `c`.`email` \
         FROM `customers` AS `c` INNER JOIN `orders` AS `o` ON `c`.`id` = `o`.`customer_id` \
         WHERE `c`.`email` LIKE '%@example.com' ORDER BY `c`.`full_name` ASC"
    );
    validate_sql(&sql, Dialect::MySql).unwrap();
}

#[test]
fn test_self_join_gets_distinct_aliases() {
    let registry = registry();
    let mut session = AliasSession::new();

    let first = registry.select_all("Customer", &mut session).unwrap();
    let second = registry.select_all("Customer", &mut session).unwrap();
    let aliases: Vec<_> = [first, second]
        .iter()
        .map(|q| q.from.base.as_ref().and_then(|b| b.alias.clone()))
        .collect();
    assert_eq!(aliases, vec![Some("c".to_string()), Some("c2".to_string())]);

    session.reset();
    let again = registry.select_all("Customer", &mut session).unwrap();
    assert_eq!(again.from.base.unwrap().alias.as_deref(), Some("c"));
}

#[test]
fn test_mapped_insert_for_every_dialect() {
    let registry = registry();
    let insert = registry
        .insert_for(
            "Order",
            [("Id", Constant::from(10)), ("CustomerId", Constant::from(3))],
        )
        .unwrap();

    assert_eq!(
        insert.to_sql(Dialect::SqlServer).unwrap(),
        "INSERT INTO [orders] ([id], [customer_id]) VALUES (10, 3)"
    );
    assert_eq!(
        insert.to_sql(Dialect::Oracle).unwrap(),
        "INSERT INTO \"orders\" (\"id\", \"customer_id\") VALUES (10, 3)"
    );
}

#[test]
fn test_unknown_record_type() {
    let err = registry()
        .insert_for("Invoice", std::iter::empty())
        .unwrap_err();
    assert_eq!(err.to_string(), "no table mapping registered for 'Invoice'");
}

#[test]
fn test_registry_from_config_file() {
    let dir = std::env::temp_dir().join(format!("sqlom-mapping-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sqlom.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[render]
dialect = "mysql"

[[mappings]]
record_type = "Product"
table_name = "products"
table_alias = "p"
columns = [
    {{ property = "Sku", column = "sku" }},
    {{ property = "Title", column = "title" }},
]
"#
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    let registry = settings.mapping_registry();
    let sql = registry
        .select_all("Product", &mut AliasSession::new())
        .unwrap()
        .to_sql(settings.render.dialect)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `p`.`sku` AS `Sku`, `p`.`title` AS `Title` FROM `products` AS `p`"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
