//! Structural validation of statements before rendering.
//!
//! Every statement and nested node implements [`Validate`]. Checks run
//! parent first, then children, and stop at the first violation. Nothing is
//! repaired: a failing tree is returned to the caller untouched.

use std::collections::HashSet;

use crate::sql::dml::{BulkInsertQuery, DeleteQuery, InsertQuery, UpdateQuery, UpdateTerm};
use crate::sql::expr::Expr;
use crate::sql::from::{FromClause, FromSource, FromTerm, Join, JoinCondition, JoinType};
use crate::sql::predicate::{SubQuery, WhereClause, WhereTerm};
use crate::sql::query::{GroupModifier, SelectQuery, SqlUnion};
use crate::sql::statement::Statement;
use crate::sql::value::{Constant, DataKind};

/// Why a statement cannot be rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    // === Bulk insert ===
    #[error("bulk insert has no rows")]
    EmptyBulkInsert,
    #[error("bulk insert rows target different tables: expected '{expected}', found '{found}'")]
    BulkInsertTableMismatch { expected: String, found: String },
    #[error("bulk insert row {row} does not set the same fields as the first row")]
    BulkInsertFieldMismatch { row: usize },
    #[error("bulk insert value for '{field}' is not a constant")]
    NonConstantValue { field: String },

    // === Insert / update / delete ===
    #[error("insert sets no fields")]
    EmptyInsert,
    #[error("update sets no fields")]
    EmptyUpdate,
    #[error("field '{0}' is assigned more than once")]
    DuplicateField(String),
    #[error("statement has an empty table name")]
    EmptyTableName,

    // === Select ===
    #[error("select has no base table or subquery")]
    MissingFrom,
    #[error("paging requires at least one order term")]
    PagingWithoutOrder,
    #[error("page size must be greater than zero")]
    InvalidPageSize,
    #[error("{context} requires an alias")]
    MissingAlias { context: &'static str },
    #[error("join references unknown table '{0}'")]
    UnknownJoinTable(String),
    #[error("field join has no field pairs")]
    EmptyJoinCondition,
    #[error("cross join cannot carry a condition")]
    UnexpectedJoinCondition,
    #[error("{0:?} join requires a condition")]
    MissingJoinCondition(JoinType),
    #[error("CUBE/ROLLUP requires GROUP BY terms")]
    GroupModifierWithoutGroupBy,
    #[error("ROW_NUMBER() requires at least one order term")]
    EmptyWindowOrder,

    // === Union ===
    #[error("union has no members")]
    EmptyUnion,
    #[error("union member {index} carries ORDER BY or paging")]
    UnionMemberOrdered { index: usize },

    // === Expressions ===
    #[error("CASE has no branches")]
    EmptyCase,
    #[error("CASE branch has an empty condition")]
    EmptyCaseCondition,
    #[error("numeric constant is not finite")]
    NonFiniteNumber,

    // === Pivot ===
    #[error("pivot has no columns")]
    PivotWithoutColumns,
    #[error("pivot column '{field}' has no values")]
    PivotColumnWithoutValues { field: String },
    #[error("pivot output name '{0}' is used more than once")]
    DuplicatePivotName(String),
    #[error("pivot value '{name}' is {found} but its column is {expected}")]
    PivotKindMismatch {
        name: String,
        expected: DataKind,
        found: DataKind,
    },
    #[error("pivot range '{0}' has neither bound")]
    EmptyPivotRange(String),
    #[error("unknown pivot value '{0}'")]
    UnknownPivotValue(String),
}

/// Consistency check run before rendering.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

// =============================================================================
// Expressions and predicates
// =============================================================================

impl Validate for Constant {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Constant::Number(n) if !n.is_finite() => Err(ValidationError::NonFiniteNumber),
            _ => Ok(()),
        }
    }
}

impl Validate for Expr {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Expr::Field { .. }
            | Expr::Parameter(_)
            | Expr::Raw(_)
            | Expr::Star { .. }
            | Expr::Null => Ok(()),
            Expr::Constant(c) => c.validate(),
            Expr::Function { args, .. } => args.iter().try_for_each(Validate::validate),
            Expr::Aggregate { arg, .. } => arg.as_deref().map_or(Ok(()), Validate::validate),
            Expr::Case {
                branches,
                else_expr,
            } => {
                if branches.is_empty() {
                    return Err(ValidationError::EmptyCase);
                }
                for branch in branches {
                    if branch.when.is_empty() {
                        return Err(ValidationError::EmptyCaseCondition);
                    }
                    branch.when.validate()?;
                    branch.then.validate()?;
                }
                else_expr.as_deref().map_or(Ok(()), Validate::validate)
            }
            Expr::BinaryOp { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Expr::DateDiff { start, end, .. } => {
                start.validate()?;
                end.validate()
            }
            Expr::IfNull { value, fallback } => {
                value.validate()?;
                fallback.validate()
            }
            Expr::SubQuery(query) => query.validate(),
            Expr::RowNumber { order_by } => {
                if order_by.is_empty() {
                    return Err(ValidationError::EmptyWindowOrder);
                }
                Ok(())
            }
        }
    }
}

impl Validate for SubQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            SubQuery::Query(q) => q.validate(),
            SubQuery::Text(_) => Ok(()),
        }
    }
}

impl Validate for WhereTerm {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            WhereTerm::Compare { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            WhereTerm::Between {
                expr, low, high, ..
            } => {
                expr.validate()?;
                low.validate()?;
                high.validate()
            }
            WhereTerm::InList { expr, values, .. } => {
                expr.validate()?;
                values.iter().try_for_each(Validate::validate)
            }
            WhereTerm::InSubQuery { expr, subquery, .. } => {
                expr.validate()?;
                subquery.validate()
            }
            WhereTerm::IsNull { expr, .. } => expr.validate(),
            WhereTerm::Exists { subquery, .. } => subquery.validate(),
            WhereTerm::Raw(_) => Ok(()),
        }
    }
}

impl Validate for WhereClause {
    fn validate(&self) -> Result<(), ValidationError> {
        self.terms.iter().try_for_each(Validate::validate)?;
        self.clauses.iter().try_for_each(Validate::validate)
    }
}

// =============================================================================
// FROM graph
// =============================================================================

impl Validate for FromTerm {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.source {
            FromSource::Table { name, .. } if name.is_empty() => {
                Err(ValidationError::EmptyTableName)
            }
            FromSource::Table { .. } | FromSource::AliasRef(_) => Ok(()),
            FromSource::SubQuery(query) => {
                if self.alias.is_none() {
                    return Err(ValidationError::MissingAlias {
                        context: "subquery",
                    });
                }
                query.validate()
            }
            FromSource::SubQueryText(_) => {
                if self.alias.is_none() {
                    return Err(ValidationError::MissingAlias {
                        context: "subquery",
                    });
                }
                Ok(())
            }
        }
    }
}

fn validate_join(join: &Join, known: &HashSet<&str>) -> Result<(), ValidationError> {
    if join.right.alias.is_none() {
        return Err(ValidationError::MissingAlias {
            context: "join target",
        });
    }
    join.right.validate()?;

    match (&join.condition, join.join_type) {
        (JoinCondition::None, JoinType::Cross) => Ok(()),
        (_, JoinType::Cross) => Err(ValidationError::UnexpectedJoinCondition),
        (JoinCondition::None, kind) => Err(ValidationError::MissingJoinCondition(kind)),
        (JoinCondition::Fields { left, pairs }, _) => {
            if !known.contains(left.as_str()) {
                return Err(ValidationError::UnknownJoinTable(left.clone()));
            }
            if pairs.is_empty() {
                return Err(ValidationError::EmptyJoinCondition);
            }
            Ok(())
        }
        (JoinCondition::Clause(clause), kind) => {
            if clause.is_empty() {
                return Err(ValidationError::MissingJoinCondition(kind));
            }
            clause.validate()
        }
    }
}

impl Validate for FromClause {
    fn validate(&self) -> Result<(), ValidationError> {
        let Some(base) = &self.base else {
            return Err(ValidationError::MissingFrom);
        };
        base.validate()?;

        // joins may only reference sources declared before them
        let mut known: HashSet<&str> = base.ref_name().into_iter().collect();
        for join in &self.joins {
            validate_join(join, &known)?;
            known.extend(join.right.ref_name());
        }
        Ok(())
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Validate for SelectQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        self.from.validate()?;

        if let Some(paging) = &self.paging {
            if paging.page_size == 0 {
                return Err(ValidationError::InvalidPageSize);
            }
            if self.order_by.is_empty() {
                return Err(ValidationError::PagingWithoutOrder);
            }
        }
        if self.group_modifier != GroupModifier::None && self.group_by.is_empty() {
            return Err(ValidationError::GroupModifierWithoutGroupBy);
        }

        for column in &self.columns {
            column.expr.validate()?;
        }
        self.where_clause.validate()?;
        self.having.validate()
    }
}

impl Validate for SqlUnion {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.members.is_empty() {
            return Err(ValidationError::EmptyUnion);
        }
        for (index, member) in self.members.iter().enumerate() {
            if !member.query.order_by.is_empty() || member.query.paging.is_some() {
                return Err(ValidationError::UnionMemberOrdered { index });
            }
            member.query.validate()?;
        }
        Ok(())
    }
}

fn validate_assignments(terms: &[UpdateTerm]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for term in terms {
        if !seen.insert(term.field.as_str()) {
            return Err(ValidationError::DuplicateField(term.field.clone()));
        }
        term.value.validate()?;
    }
    Ok(())
}

impl Validate for InsertQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.table.is_empty() {
            return Err(ValidationError::EmptyTableName);
        }
        if self.terms.is_empty() {
            return Err(ValidationError::EmptyInsert);
        }
        validate_assignments(&self.terms)
    }
}

fn qualified_target(insert: &InsertQuery) -> String {
    match &insert.namespace {
        Some(namespace) => format!("{namespace}.{}", insert.table),
        None => insert.table.clone(),
    }
}

impl Validate for BulkInsertQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        let Some(first) = self.rows.first() else {
            return Err(ValidationError::EmptyBulkInsert);
        };
        let fields: HashSet<&str> = first.terms.iter().map(|t| t.field.as_str()).collect();

        for (row, insert) in self.rows.iter().enumerate() {
            insert.validate()?;
            if (&insert.namespace, &insert.table) != (&first.namespace, &first.table) {
                return Err(ValidationError::BulkInsertTableMismatch {
                    expected: qualified_target(first),
                    found: qualified_target(insert),
                });
            }
            let row_fields: HashSet<&str> =
                insert.terms.iter().map(|t| t.field.as_str()).collect();
            if row_fields != fields {
                return Err(ValidationError::BulkInsertFieldMismatch { row });
            }
            if let Some(term) = insert.terms.iter().find(|t| !t.value.is_literal()) {
                return Err(ValidationError::NonConstantValue {
                    field: term.field.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Validate for UpdateQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.table.is_empty() {
            return Err(ValidationError::EmptyTableName);
        }
        if self.terms.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        validate_assignments(&self.terms)?;
        self.where_clause.validate()
    }
}

impl Validate for DeleteQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.table.is_empty() {
            return Err(ValidationError::EmptyTableName);
        }
        self.where_clause.validate()
    }
}

impl Validate for Statement {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Statement::Select(q) => q.validate(),
            Statement::Union(u) => u.validate(),
            Statement::Insert(i) => i.validate(),
            Statement::BulkInsert(b) => b.validate(),
            Statement::Update(u) => u.validate(),
            Statement::Delete(d) => d.validate(),
        }
    }
}
