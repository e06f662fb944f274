//! Hard-constraint row filter.

use super::types::{cell_equals, Constraint, ConstraintMap};
use crate::table::Table;

/// Keeps the rows that satisfy every constraint.
///
/// Constraints are applied conjunctively in map order. Keys that do not
/// resolve to a column are skipped. Equality is numeric when both the cell
/// and the value parse as numbers. A range whose column has no numeric
/// cell falls back to equality on its pinned value, and is skipped when it
/// has none. The result may be empty; that is a valid outcome.
///
/// # Examples
///
/// ```
/// use u_mrprank::constraints::{filter, Constraint, ConstraintMap};
/// use u_mrprank::table::Table;
///
/// let table = Table::from_rows(
///     vec!["processing_unit".into(), "f1_score".into()],
///     vec![
///         vec!["GPU".into(), "0.8".into()],
///         vec!["CPU".into(), "0.6".into()],
///     ],
/// )
/// .unwrap();
///
/// let gpu_only = ConstraintMap::new().with("Processing_Unit", Constraint::equals("GPU"));
/// assert_eq!(filter(&table, &gpu_only).len(), 1);
/// ```
pub fn filter(table: &Table, constraints: &ConstraintMap) -> Table {
    let mut current = table.clone();

    for (key, constraint) in constraints.iter() {
        let Some(col) = current.resolve_column(key) else {
            tracing::debug!(column = key, "Constraint column not found; skipped.");
            continue;
        };

        let keep: Vec<usize> = match constraint {
            // Both ends open: match the pinned value whatever the column holds.
            Constraint::Range {
                low: None,
                high: None,
                pinned: Some(value),
            } => matching_rows(&current, col, |cell| cell_equals(cell, value)),
            Constraint::Range { low, high, pinned } => {
                if current.is_numeric(col) {
                    current
                        .numeric_column(col)
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| within(**v, *low, *high))
                        .map(|(i, _)| i)
                        .collect()
                } else if let Some(value) = pinned {
                    matching_rows(&current, col, |cell| cell_equals(cell, value))
                } else {
                    tracing::debug!(column = key, "Range on non-numeric column; skipped.");
                    continue;
                }
            }
            Constraint::Categorical { values } => matching_rows(&current, col, |cell| {
                values.iter().any(|v| cell_equals(cell, v))
            }),
        };

        current = current.select(&keep);
    }

    tracing::debug!(
        rows_in = table.len(),
        rows_out = current.len(),
        "Hard constraints applied."
    );
    current
}

/// Open bounds accept everything, including missing values; a present
/// bound rejects missing values.
fn within(value: Option<f64>, low: Option<f64>, high: Option<f64>) -> bool {
    let above = low.is_none_or(|l| value.is_some_and(|v| v >= l));
    let below = high.is_none_or(|h| value.is_some_and(|v| v <= h));
    above && below
}

fn matching_rows(table: &Table, col: usize, pred: impl Fn(&str) -> bool) -> Vec<usize> {
    table
        .column_values(col)
        .enumerate()
        .filter(|(_, cell)| pred(cell))
        .map(|(i, _)| i)
        .collect()
}
