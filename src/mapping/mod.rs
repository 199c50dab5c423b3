//! Record type to table mapping.
//!
//! Mappings are plain data: they can be declared in code or loaded from the
//! `[[mappings]]` tables of `sqlom.toml`.

mod alias;

pub use alias::AliasSession;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sql::dml::InsertQuery;
use crate::sql::expr::{table_col, ExprExt};
use crate::sql::from::FromTerm;
use crate::sql::query::SelectQuery;
use crate::sql::value::Constant;

/// One property of a record type and the column that stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub property: String,
    pub column: String,
    /// Ignored properties are never read or written.
    #[serde(default)]
    pub ignored: bool,
}

impl ColumnMapping {
    pub fn new(property: &str, column: &str) -> Self {
        Self {
            property: property.into(),
            column: column.into(),
            ignored: false,
        }
    }
}

/// Where a record type is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct TableMapping {
    pub record_type: String,
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
}

impl TableMapping {
    pub fn new(record_type: &str, table_name: &str) -> Self {
        Self {
            record_type: record_type.into(),
            table_name: table_name.into(),
            table_alias: None,
            columns: vec![],
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn column(mut self, property: &str, column: &str) -> Self {
        self.columns.push(ColumnMapping::new(property, column));
        self
    }

    pub fn ignore(mut self, property: &str) -> Self {
        self.columns.push(ColumnMapping {
            ignored: true,
            ..ColumnMapping::new(property, property)
        });
        self
    }

    /// Column storing `property`; `None` when unknown or ignored.
    pub fn column_for(&self, property: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.property == property && !c.ignored)
            .map(|c| c.column.as_str())
    }

    fn mapped(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|c| !c.ignored)
    }
}

/// All known mappings, keyed by record type.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    mappings: HashMap<String, TableMapping>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping, replacing any earlier one for the same record type.
    pub fn register(&mut self, mapping: TableMapping) {
        tracing::trace!(record_type = %mapping.record_type, table = %mapping.table_name, "registered mapping");
        self.mappings.insert(mapping.record_type.clone(), mapping);
    }

    pub fn get(&self, record_type: &str) -> Option<&TableMapping> {
        self.mappings.get(record_type)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn require(&self, record_type: &str) -> Result<&TableMapping> {
        self.get(record_type)
            .ok_or_else(|| Error::UnknownRecordType(record_type.into()))
    }

    /// `SELECT` every mapped property of `record_type`.
    ///
    /// Columns are qualified with the mapping's alias, or a fresh one from
    /// `session`, and renamed to their property when the names differ.
    pub fn select_all(&self, record_type: &str, session: &mut AliasSession) -> Result<SelectQuery> {
        let mapping = self.require(record_type)?;
        let alias = match &mapping.table_alias {
            Some(alias) => alias.clone(),
            None => session.next_alias(&mapping.table_name),
        };

        let mut query =
            SelectQuery::new().from(FromTerm::table(&mapping.table_name).with_alias(&alias));
        for c in mapping.mapped() {
            let field = table_col(&alias, &c.column);
            query = if c.column == c.property {
                query.column(field)
            } else {
                query.column(field.alias(&c.property))
            };
        }
        Ok(query)
    }

    /// `INSERT` a record given as `(property, value)` pairs.
    ///
    /// Ignored properties are skipped; unknown ones are an error.
    pub fn insert_for<'a>(
        &self,
        record_type: &str,
        values: impl IntoIterator<Item = (&'a str, Constant)>,
    ) -> Result<InsertQuery> {
        let mapping = self.require(record_type)?;
        let mut insert = InsertQuery::into(&mapping.table_name);

        for (property, value) in values {
            let Some(c) = mapping.columns.iter().find(|c| c.property == property) else {
                return Err(Error::UnknownProperty {
                    record_type: record_type.into(),
                    property: property.into(),
                });
            };
            if !c.ignored {
                insert = insert.set(&c.column, value);
            }
        }
        Ok(insert)
    }
}

impl FromIterator<TableMapping> for MappingRegistry {
    fn from_iter<I: IntoIterator<Item = TableMapping>>(iter: I) -> Self {
        let mut registry = MappingRegistry::new();
        for mapping in iter {
            registry.register(mapping);
        }
        registry
    }
}
