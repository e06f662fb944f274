//! Transition model estimation over categorical hierarchy columns.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use super::matrix::TransitionMatrix;
use crate::error::{Error, Result};
use crate::table::Table;

/// The distinct values of one hierarchy column.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Column name as configured.
    pub column: String,
    /// Distinct values, sorted case-insensitively.
    pub labels: Vec<String>,
    /// Matrix index of each label. A value first seen at an earlier level
    /// keeps that level's index.
    pub states: Vec<usize>,
    /// Indices first assigned at this level.
    pub range: Range<usize>,
}

/// Output of [`estimate`].
#[derive(Debug, Clone)]
pub struct TransitionEstimate {
    /// Row-stochastic matrix over the union of all level values.
    pub matrix: TransitionMatrix,
    /// Per-level values in hierarchy order.
    pub levels: Vec<Level>,
    /// Blending factor `|subset| / |full|`.
    pub alpha: f64,
}

/// Estimates `P(child | parent)` between adjacent hierarchy levels.
///
/// States are the distinct values of every hierarchy column in `full`,
/// indexed level by level in case-insensitive order; a value shared by two
/// levels is one state. For a parent `p` and a child `c` seen under it in
/// `full`:
///
/// ```text
/// P[p, c] = (n_full(p, c) + alpha * n_subset(p, c)) / (n_full(p) + alpha * n_subset(p))
/// ```
///
/// with `alpha = |subset| / |full|`. Rows left empty become absorbing.
///
/// # Errors
///
/// [`Error::UnknownColumn`] if a hierarchy column is missing from `full`,
/// or from a non-empty `subset`.
pub fn estimate(full: &Table, subset: &Table, hierarchy: &[String]) -> Result<TransitionEstimate> {
    let full_cols = resolve_required(full, hierarchy)?;
    let subset_cols = resolve_subset(subset, hierarchy)?;

    let mut levels = Vec::with_capacity(hierarchy.len());
    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (column, &col) in hierarchy.iter().zip(&full_cols) {
        let mut values: Vec<String> = full
            .column_values(col)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        values.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));

        let start = labels.len();
        let states = values
            .iter()
            .map(|value| {
                *index.entry(value.clone()).or_insert_with(|| {
                    labels.push(value.clone());
                    labels.len() - 1
                })
            })
            .collect();
        levels.push(Level {
            column: column.clone(),
            labels: values,
            states,
            range: start..labels.len(),
        });
    }

    let alpha = if full.is_empty() {
        0.0
    } else {
        subset.len() as f64 / full.len() as f64
    };

    let mut matrix = TransitionMatrix::zeros(labels);

    for level in 0..levels.len().saturating_sub(1) {
        let full_counts = PairCounts::tally(full, full_cols[level], full_cols[level + 1]);
        let subset_counts = match (subset_cols[level], subset_cols[level + 1]) {
            (Some(p), Some(c)) => PairCounts::tally(subset, p, c),
            _ => PairCounts::default(),
        };

        let parents = &levels[level];
        for (parent, &from) in parents.labels.iter().zip(&parents.states) {
            let base = full_counts.parent_rows(parent);
            let denominator = base + alpha * subset_counts.parent_pairs(parent);
            if denominator == 0.0 {
                continue;
            }

            for (child, count) in full_counts.children(parent) {
                let selected = subset_counts.pair(parent, child);
                let probability = (count + alpha * selected) / denominator;
                matrix.set(from, index[child], probability);
            }
        }
    }

    let repaired = matrix.repair_absorbing();
    tracing::debug!(
        states = matrix.num_states(),
        levels = levels.len(),
        absorbing = repaired.len(),
        alpha,
        "Transition model estimated."
    );

    Ok(TransitionEstimate {
        matrix,
        levels,
        alpha,
    })
}

fn resolve_required(table: &Table, hierarchy: &[String]) -> Result<Vec<usize>> {
    hierarchy
        .iter()
        .map(|column| {
            table
                .resolve_column(column)
                .ok_or_else(|| Error::UnknownColumn(column.clone()))
        })
        .collect()
}

/// Like [`resolve_required`], but an empty subset contributes no evidence
/// and needs no columns.
fn resolve_subset(table: &Table, hierarchy: &[String]) -> Result<Vec<Option<usize>>> {
    if table.is_empty() {
        return Ok(hierarchy.iter().map(|c| table.resolve_column(c)).collect());
    }
    Ok(resolve_required(table, hierarchy)?
        .into_iter()
        .map(Some)
        .collect())
}

/// Co-occurrence counts between a parent and a child column.
#[derive(Debug, Default)]
struct PairCounts<'a> {
    /// Rows per parent value, including rows whose child cell is missing.
    rows: HashMap<&'a str, f64>,
    /// Rows per parent value with a present child cell.
    pairs_total: HashMap<&'a str, f64>,
    pairs: HashMap<(&'a str, &'a str), f64>,
    /// Children per parent, in first-seen order.
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PairCounts<'a> {
    fn tally(table: &'a Table, parent_col: usize, child_col: usize) -> Self {
        let mut counts = PairCounts::default();
        for row in table.rows() {
            let parent = row[parent_col].as_str();
            let child = row[child_col].as_str();
            if parent.is_empty() {
                continue;
            }
            *counts.rows.entry(parent).or_insert(0.0) += 1.0;
            if child.is_empty() {
                continue;
            }
            *counts.pairs_total.entry(parent).or_insert(0.0) += 1.0;
            let seen = counts.pairs.entry((parent, child)).or_insert(0.0);
            if *seen == 0.0 {
                counts.children.entry(parent).or_default().push(child);
            }
            *seen += 1.0;
        }
        counts
    }

    fn parent_rows(&self, parent: &str) -> f64 {
        self.rows.get(parent).copied().unwrap_or(0.0)
    }

    fn parent_pairs(&self, parent: &str) -> f64 {
        self.pairs_total.get(parent).copied().unwrap_or(0.0)
    }

    fn pair(&self, parent: &str, child: &str) -> f64 {
        self.pairs.get(&(parent, child)).copied().unwrap_or(0.0)
    }

    fn children(&self, parent: &str) -> Vec<(&'a str, f64)> {
        self.children
            .get(parent)
            .into_iter()
            .flatten()
            .map(|&child| (child, self.pair(parent, child)))
            .collect()
    }
}
