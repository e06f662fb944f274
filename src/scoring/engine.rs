//! Weighted multi-criteria utility.

use super::normalize::{normalize, Direction};
use crate::constraints::{Constraint, ConstraintMap, RewardValues};
use crate::table::Table;

/// One weighted column, with its kind decided once against the table.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreTerm {
    /// Min-max normalised column scaled by `weight`.
    Numeric {
        column: usize,
        direction: Direction,
        weight: f64,
    },

    /// Matched column: `weight` for a row equal to the chosen value, 0
    /// otherwise, and `weight` for every row when nothing is chosen.
    Categorical {
        column: usize,
        chosen: Option<Constraint>,
        weight: f64,
    },
}

impl ScoreTerm {
    fn contribute(&self, table: &Table, totals: &mut [f64]) {
        match self {
            ScoreTerm::Numeric {
                column,
                direction,
                weight,
            } => {
                let normalized = normalize(&table.numeric_column(*column), *direction);
                for (total, n) in totals.iter_mut().zip(normalized) {
                    *total += weight * n;
                }
            }
            ScoreTerm::Categorical {
                column,
                chosen,
                weight,
            } => {
                for (total, cell) in totals.iter_mut().zip(table.column_values(*column)) {
                    let matched = chosen
                        .as_ref()
                        .and_then(|c| c.chosen_match(cell))
                        .unwrap_or(true);
                    if matched {
                        *total += weight;
                    }
                }
            }
        }
    }
}

/// Additive scorer over the weighted columns of one table.
///
/// # Examples
///
/// ```
/// use u_mrprank::constraints::{ConstraintMap, RewardValues};
/// use u_mrprank::scoring::UtilityScorer;
/// use u_mrprank::table::Table;
///
/// let table = Table::from_rows(
///     vec!["f1_score".into()],
///     vec![vec!["0.8".into()], vec!["0.6".into()]],
/// )
/// .unwrap();
/// let weights = RewardValues::new().with_weight("f1", 3.0);
///
/// let scorer = UtilityScorer::plan(&table, &weights, &ConstraintMap::new());
/// assert_eq!(scorer.score(&table), vec![3.0, 0.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UtilityScorer {
    terms: Vec<ScoreTerm>,
}

impl UtilityScorer {
    /// Resolves every weighted column of `table`.
    ///
    /// Weights whose column does not resolve are skipped. A column with at
    /// least one numeric cell is numeric; any other is categorical and
    /// takes its chosen value from `constraints`.
    pub fn plan(table: &Table, weights: &RewardValues, constraints: &ConstraintMap) -> Self {
        let mut terms = Vec::with_capacity(weights.len());
        for (key, value) in weights.iter() {
            let Some(column) = table.resolve_column(key) else {
                tracing::debug!(column = key, "Weight column not found; skipped.");
                continue;
            };
            let weight = value.weight();
            let term = if table.is_numeric(column) {
                ScoreTerm::Numeric {
                    column,
                    direction: Direction::for_column(&table.columns()[column]),
                    weight,
                }
            } else {
                ScoreTerm::Categorical {
                    column,
                    chosen: constraints.for_column(table.columns(), column).cloned(),
                    weight,
                }
            };
            terms.push(term);
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[ScoreTerm] {
        &self.terms
    }

    /// Total utility per row, in row order.
    pub fn score(&self, table: &Table) -> Vec<f64> {
        let mut totals = vec![0.0; table.len()];
        for term in &self.terms {
            term.contribute(table, &mut totals);
        }
        totals
    }
}

/// Convenience for [`UtilityScorer::plan`] followed by [`UtilityScorer::score`].
pub fn weighted_utility(
    table: &Table,
    weights: &RewardValues,
    constraints: &ConstraintMap,
) -> Vec<f64> {
    UtilityScorer::plan(table, weights, constraints).score(table)
}
