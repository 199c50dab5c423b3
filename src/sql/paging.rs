//! ROW_NUMBER() paging rewrite for dialects without native LIMIT/OFFSET.
//!
//! A paged query `q` becomes three nested blocks:
//!
//! ```text
//! SELECT wrapperRowFilter.<cols>
//! FROM (
//!     SELECT wrapper.*, ROW_NUMBER() OVER (ORDER BY wrapper.<order>) AS ROW_NUMBER
//!     FROM (<q without order, paging, top>) AS wrapper
//! ) AS wrapperRowFilter
//! WHERE wrapperRowFilter.ROW_NUMBER BETWEEN i*N+1 AND min(i*N+N, top)
//! ORDER BY wrapperRowFilter.<order>
//! ```

use super::expr::{col, table_col, table_star, Expr, ExprExt};
use super::from::FromTerm;
use super::query::{OrderByTerm, SelectColumn, SelectQuery, SortDirection};
use crate::error::Result;
use crate::validation::ValidationError;

pub const WRAPPER: &str = "wrapper";
pub const ROW_FILTER: &str = "wrapperRowFilter";
pub const ROW_NUMBER: &str = "ROW_NUMBER";

/// Rewrite a paged query into nested ROW_NUMBER() blocks.
///
/// The input is never mutated. Queries without paging come back as a plain clone.
pub fn row_number_rewrite(query: &SelectQuery) -> Result<SelectQuery> {
    let Some(paging) = query.paging else {
        return Ok(query.clone());
    };
    if query.order_by.is_empty() {
        return Err(ValidationError::PagingWithoutOrder.into());
    }

    let mut base = query.clone();
    base.paging = None;
    base.top = None;
    base.order_by.clear();
    base.columns.retain(|c| {
        !c.output_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(ROW_NUMBER))
    });

    // Expression columns get a positional name so the outer block can re-project them.
    for i in 0..base.columns.len() {
        if base.columns[i].output_name().is_none() && !is_star(&base.columns[i]) {
            let name = free_name(&base.columns, &format!("col{}", i + 1));
            base.columns[i].alias = Some(name);
        }
    }
    let visible = base.columns.len();

    // Sort fields the caller did not select ride along as hidden columns.
    let mut sort_keys = Vec::with_capacity(query.order_by.len());
    for term in &query.order_by {
        let name = match sorted_column(term, &base.columns) {
            Some(name) => name.to_string(),
            None if covered_by_star(term, &base.columns) => term.field.clone(),
            None => {
                let name = free_name(&base.columns, &term.field);
                let field = match &term.table {
                    Some(table) => table_col(table, &term.field),
                    None => col(&term.field),
                };
                let mut hidden = SelectColumn::new(field);
                if name != term.field {
                    hidden = hidden.with_alias(&name);
                }
                base.columns.push(hidden);
                name
            }
        };
        sort_keys.push((name, term.direction));
    }

    let middle_order = requalify(&sort_keys, WRAPPER);
    let outer_order = requalify(&sort_keys, ROW_FILTER);

    let shown = &base.columns[..visible];
    let outer_columns = if shown.is_empty() || shown.iter().any(is_star) {
        vec![SelectColumn::new(table_star(ROW_FILTER))]
    } else {
        shown
            .iter()
            .filter_map(SelectColumn::output_name)
            .map(|name| SelectColumn::new(table_col(ROW_FILTER, name)))
            .collect()
    };

    let first = paging.offset().saturating_add(1);
    let mut last = paging.offset().saturating_add(paging.page_size);
    if let Some(top) = query.top {
        last = last.min(top);
    }

    tracing::trace!(
        page_index = paging.page_index,
        page_size = paging.page_size,
        first,
        last,
        "rewriting paged query with ROW_NUMBER()"
    );

    let middle = SelectQuery::new()
        .column(table_star(WRAPPER))
        .column(Expr::RowNumber { order_by: middle_order }.alias(ROW_NUMBER))
        .from(FromTerm::subquery(base, WRAPPER));

    let mut outer = SelectQuery::new()
        .from(FromTerm::subquery(middle, ROW_FILTER))
        .filter(table_col(ROW_FILTER, ROW_NUMBER).between(as_int(first), as_int(last)));
    outer.columns = outer_columns;
    outer.order_by = outer_order;

    Ok(outer)
}

fn as_int(n: u64) -> Expr {
    super::expr::lit_int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn requalify(sort_keys: &[(String, SortDirection)], alias: &str) -> Vec<OrderByTerm> {
    sort_keys
        .iter()
        .map(|(name, direction)| OrderByTerm::new(name).table(alias).direction(*direction))
        .collect()
}

/// Output name of the projected column an order term sorts on.
fn sorted_column<'a>(term: &OrderByTerm, columns: &'a [SelectColumn]) -> Option<&'a str> {
    if let Some(name) = columns
        .iter()
        .find(|c| sorts_on(term, c))
        .and_then(SelectColumn::output_name)
    {
        return Some(name);
    }
    // ORDER BY <alias>
    if term.table.is_none() {
        return columns
            .iter()
            .filter_map(SelectColumn::output_name)
            .find(|name| *name == term.field);
    }
    None
}

fn sorts_on(term: &OrderByTerm, column: &SelectColumn) -> bool {
    match &column.expr {
        Expr::Field { name, table } => {
            name == &term.field
                && match (&term.table, table) {
                    (Some(a), Some(b)) => a == b,
                    (Some(_), None) => false,
                    (None, _) => true,
                }
        }
        _ => false,
    }
}

fn is_star(column: &SelectColumn) -> bool {
    matches!(column.expr, Expr::Star { .. })
}

/// Whether a star projection already carries the sorted field.
fn covered_by_star(term: &OrderByTerm, columns: &[SelectColumn]) -> bool {
    columns.is_empty()
        || columns.iter().any(|c| match &c.expr {
            Expr::Star { table: None } => true,
            Expr::Star { table: Some(t) } => term.table.as_ref().map_or(true, |own| own == t),
            _ => false,
        })
}

/// `stem`, or `stem2`, `stem3`... when an output column already uses the name.
fn free_name(columns: &[SelectColumn], stem: &str) -> String {
    let taken = |name: &str| {
        columns
            .iter()
            .filter_map(SelectColumn::output_name)
            .any(|n| n.eq_ignore_ascii_case(name))
    };
    let mut name = stem.to_string();
    let mut n = 1;
    while taken(&name) {
        n += 1;
        name = format!("{stem}{n}");
    }
    name
}
