//! Reward function over graph states.

use crate::constraints::{cell_equals, Constraint, ConstraintMap, RewardValues};
use crate::error::{Error, Result};
use crate::table::Table;

/// One reward per state: zeros for inner states, then one reward per leaf
/// row in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RewardFunction {
    values: Vec<f64>,
}

impl RewardFunction {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Builds the reward function for a graph of `num_states` states whose
    /// last `leaf_rows.len()` states are leaves.
    ///
    /// # Errors
    ///
    /// [`Error::NegativeInnerNodeCount`] if there are more leaf rows than
    /// states, and [`Error::InvalidRange`] from [`leaf_rewards`].
    pub fn from_constraints(
        num_states: usize,
        leaf_rows: &Table,
        constraints: &ConstraintMap,
        reward_values: &RewardValues,
    ) -> Result<Self> {
        let leaves = leaf_rows.len();
        let inner = num_states
            .checked_sub(leaves)
            .ok_or(Error::NegativeInnerNodeCount {
                states: num_states,
                leaves,
            })?;

        let mut values = vec![0.0; inner];
        values.extend(leaf_rewards(leaf_rows, constraints, reward_values)?);
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Computes one reward per row from constraint matches.
///
/// Every constrained column that resolves in `leaf_rows` contributes the
/// column's `high` reward to a satisfying row and its `low` reward to the
/// others; contributions are summed across columns. A column reached by
/// several keys (`acc` and `accuracy`) is scored once, by the first.
///
/// - A range on a numeric column substitutes missing or infinite bounds with
///   the column's observed minimum or maximum. Missing cells fail the range.
/// - A range on a non-numeric column, or with both ends open, matches its
///   pinned value. Without one it is skipped on a non-numeric column.
/// - A categorical constraint matches by membership, numerically when both
///   sides parse as numbers.
///
/// # Errors
///
/// [`Error::InvalidRange`] if `low > high` after substitution.
pub fn leaf_rewards(
    leaf_rows: &Table,
    constraints: &ConstraintMap,
    reward_values: &RewardValues,
) -> Result<Vec<f64>> {
    let mut total = vec![0.0; leaf_rows.len()];
    if leaf_rows.is_empty() {
        return Ok(total);
    }

    let mut scored = vec![false; leaf_rows.num_columns()];
    for (key, constraint) in constraints.iter() {
        let Some(col) = leaf_rows.resolve_column(key) else {
            tracing::debug!(column = key, "Reward column not found; skipped.");
            continue;
        };
        if std::mem::replace(&mut scored[col], true) {
            tracing::debug!(column = key, "Column already scored; skipped.");
            continue;
        }
        let column = &leaf_rows.columns()[col];
        let reward = reward_values.get_or_default(key, column);

        match constraint {
            Constraint::Range {
                low: None,
                high: None,
                pinned: Some(value),
            } => {
                for (sum, cell) in total.iter_mut().zip(leaf_rows.column_values(col)) {
                    *sum += if cell_equals(cell, value) {
                        reward.high
                    } else {
                        reward.low
                    };
                }
            }
            Constraint::Range { low, high, .. } if leaf_rows.is_numeric(col) => {
                let values = leaf_rows.numeric_column(col);
                let (low, high) = substitute_bounds(&values, *low, *high);
                if low > high {
                    return Err(Error::InvalidRange {
                        column: column.clone(),
                        low,
                        high,
                    });
                }
                for (sum, value) in total.iter_mut().zip(&values) {
                    *sum += match value {
                        Some(v) if low <= *v && *v <= high => reward.high,
                        _ => reward.low,
                    };
                }
            }
            Constraint::Range {
                pinned: Some(value),
                ..
            } => {
                for (sum, cell) in total.iter_mut().zip(leaf_rows.column_values(col)) {
                    *sum += if cell_equals(cell, value) {
                        reward.high
                    } else {
                        reward.low
                    };
                }
            }
            Constraint::Range { pinned: None, .. } => {
                tracing::debug!(column = key, "Range on non-numeric column; no reward.");
            }
            Constraint::Categorical { values } => {
                for (sum, cell) in total.iter_mut().zip(leaf_rows.column_values(col)) {
                    *sum += if values.iter().any(|v| cell_equals(cell, v)) {
                        reward.high
                    } else {
                        reward.low
                    };
                }
            }
        }
    }

    Ok(total)
}

fn substitute_bounds(values: &[Option<f64>], low: Option<f64>, high: Option<f64>) -> (f64, f64) {
    let observed = values.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = observed.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let low = low.filter(|b| b.is_finite()).unwrap_or(min);
    let high = high.filter(|b| b.is_finite()).unwrap_or(max);
    (low, high)
}
