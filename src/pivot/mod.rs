//! Cross-tab (pivot) queries.
//!
//! A [`PivotTable`] turns rows of `(row_field, pivot fields..., value_field)`
//! into one output row per `row_field` value, with one aggregated column per
//! named pivot value:
//!
//! ```text
//! SELECT region,
//!        SUM(CASE WHEN year = 2023 THEN amount ELSE NULL END) AS y2023,
//!        SUM(CASE WHEN year = 2024 THEN amount ELSE NULL END) AS y2024,
//!        SUM(amount) AS Total
//! FROM sales
//! GROUP BY region
//! ORDER BY region
//! ```
//!
//! The drill-down for one cell selects the underlying rows with the same match.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sql::expr::{case_when, col, null, AggregateFunction, Expr, ExprExt};
use crate::sql::from::FromTerm;
use crate::sql::predicate::WhereClause;
use crate::sql::query::{GroupByTerm, OrderByTerm, SelectQuery};
use crate::sql::value::{Constant, DataKind};
use crate::validation::{Validate, ValidationError};

/// How a pivot value selects rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotMatch {
    /// `field = value`
    Scalar(Constant),
    /// Half-open `[low, high)`; a missing bound is unbounded.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        low: Option<Constant>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        high: Option<Constant>,
    },
}

/// A named output column of the pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotValue {
    pub name: String,
    pub matcher: PivotMatch,
}

/// A field whose values become output columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct PivotColumn {
    pub field: String,
    pub kind: DataKind,
    pub values: Vec<PivotValue>,
}

impl PivotColumn {
    pub fn new(field: &str, kind: DataKind) -> Self {
        Self {
            field: field.into(),
            kind,
            values: vec![],
        }
    }

    /// Add a column matching `field = value`.
    pub fn value(mut self, name: &str, value: impl Into<Constant>) -> Self {
        self.values.push(PivotValue {
            name: name.into(),
            matcher: PivotMatch::Scalar(value.into()),
        });
        self
    }

    /// Add a column matching `low <= field < high`.
    pub fn range(mut self, name: &str, low: Option<Constant>, high: Option<Constant>) -> Self {
        self.values.push(PivotValue {
            name: name.into(),
            matcher: PivotMatch::Range { low, high },
        });
        self
    }
}

/// A cross-tab definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct PivotTable {
    /// Table or aliased subquery the rows come from.
    pub base: FromTerm,
    pub function: AggregateFunction,
    pub value_field: String,
    pub row_field: String,
    #[serde(default)]
    pub columns: Vec<PivotColumn>,
    /// Name of the optional all-values aggregate column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_column: Option<String>,
}

impl PivotTable {
    pub fn new(
        base: FromTerm,
        function: AggregateFunction,
        value_field: &str,
        row_field: &str,
    ) -> Self {
        Self {
            base,
            function,
            value_field: value_field.into(),
            row_field: row_field.into(),
            columns: vec![],
            total_column: None,
        }
    }

    pub fn column(mut self, column: PivotColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a total column named `name`.
    pub fn total(mut self, name: &str) -> Self {
        self.total_column = Some(name.into());
        self
    }

    fn aggregate(&self, arg: Expr) -> Expr {
        Expr::Aggregate {
            func: self.function,
            arg: Some(Box::new(arg)),
            distinct: false,
        }
    }

    /// Build the cross-tab SELECT.
    pub fn build(&self) -> Result<SelectQuery> {
        self.validate()?;

        let mut query = SelectQuery::new()
            .from(self.base.clone())
            .column(col(&self.row_field));

        for column in &self.columns {
            for value in &column.values {
                let cell = case_when(
                    vec![(match_clause(&column.field, &value.matcher), col(&self.value_field))],
                    Some(null()),
                );
                query = query.column(self.aggregate(cell).alias(&value.name));
            }
        }
        if let Some(total) = &self.total_column {
            query = query.column(self.aggregate(col(&self.value_field)).alias(total));
        }

        tracing::debug!(
            row_field = %self.row_field,
            columns = query.columns.len(),
            "built pivot query"
        );

        Ok(query
            .group_by(GroupByTerm::new(&self.row_field))
            .order_by(OrderByTerm::new(&self.row_field)))
    }

    /// Rows behind the cell at (`row_value`, `value_name`).
    ///
    /// `None` selects the group whose row field is NULL.
    pub fn build_drill_down(
        &self,
        row_value: Option<Constant>,
        value_name: &str,
    ) -> Result<SelectQuery> {
        self.validate()?;

        let (column, value) = self
            .columns
            .iter()
            .find_map(|c| c.values.iter().find(|v| v.name == value_name).map(|v| (c, v)))
            .ok_or_else(|| ValidationError::UnknownPivotValue(value_name.into()))?;

        let row = col(&self.row_field);
        let mut clause = WhereClause::and().term(match row_value {
            Some(value) => row.eq(value),
            None => row.is_null(),
        });
        clause
            .terms
            .extend(match_clause(&column.field, &value.matcher).terms);

        Ok(SelectQuery::new()
            .from(self.base.clone())
            .where_clause(clause))
    }

    /// Output column names in projection order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.row_field.as_str())
            .chain(
                self.columns
                    .iter()
                    .flat_map(|c| c.values.iter().map(|v| v.name.as_str())),
            )
            .chain(self.total_column.as_deref())
    }
}

/// The predicate shared by a pivot cell and its drill-down.
fn match_clause(field: &str, matcher: &PivotMatch) -> WhereClause {
    let mut clause = WhereClause::and();
    match matcher {
        PivotMatch::Scalar(value) => {
            clause = clause.term(col(field).eq(value.clone()));
        }
        PivotMatch::Range { low, high } => {
            if let Some(low) = low {
                clause = clause.term(col(field).gte(low.clone()));
            }
            if let Some(high) = high {
                clause = clause.term(col(field).lt(high.clone()));
            }
        }
    }
    clause
}

impl Validate for PivotTable {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.base.validate()?;
        if self.columns.is_empty() {
            return Err(ValidationError::PivotWithoutColumns);
        }

        let mut names = HashSet::new();
        for name in self.output_names() {
            if !names.insert(name) {
                return Err(ValidationError::DuplicatePivotName(name.into()));
            }
        }

        for column in &self.columns {
            if column.values.is_empty() {
                return Err(ValidationError::PivotColumnWithoutValues {
                    field: column.field.clone(),
                });
            }
            for value in &column.values {
                let bounds: Vec<&Constant> = match &value.matcher {
                    PivotMatch::Scalar(c) => vec![c],
                    PivotMatch::Range { low, high } => {
                        let bounds: Vec<_> = low.iter().chain(high.iter()).collect();
                        if bounds.is_empty() {
                            return Err(ValidationError::EmptyPivotRange(value.name.clone()));
                        }
                        bounds
                    }
                };
                for bound in bounds {
                    bound.validate()?;
                    if bound.kind() != column.kind {
                        return Err(ValidationError::PivotKindMismatch {
                            name: value.name.clone(),
                            expected: column.kind,
                            found: bound.kind(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
