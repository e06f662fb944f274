//! Labeled transition matrix.

use nalgebra::DMatrix;

use crate::error::{Error, Result};

/// Square, non-negative transition matrix with one label per state.
///
/// Row `i` holds the probabilities of moving from state `i` to every other
/// state. Labels are the categorical values the states stand for and are
/// what the persisted form uses as row and column headers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    labels: Vec<String>,
    values: DMatrix<f64>,
}

impl TransitionMatrix {
    /// Wraps a matrix, checking that it is square and fully labeled.
    pub fn new(labels: Vec<String>, values: DMatrix<f64>) -> Result<Self> {
        if values.nrows() != values.ncols() {
            return Err(Error::NonSquareMatrix {
                rows: values.nrows(),
                cols: values.ncols(),
            });
        }
        if labels.len() != values.nrows() {
            return Err(Error::LabelMismatch {
                labels: labels.len(),
                states: values.nrows(),
            });
        }
        Ok(Self { labels, values })
    }

    /// An all-zero matrix over `labels`.
    pub fn zeros(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            values: DMatrix::zeros(n, n),
        }
    }

    pub fn num_states(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// `P[from, to]`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[(from, to)]
    }

    pub(crate) fn set(&mut self, from: usize, to: usize, probability: f64) {
        self.values[(from, to)] = probability;
    }

    /// Index of the first state carrying `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// `P[from, to]` looked up by label.
    pub fn probability(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.get(self.index_of(from)?, self.index_of(to)?))
    }

    pub fn row_sum(&self, state: usize) -> f64 {
        self.values.row(state).sum()
    }

    /// Whether the only outgoing transition of `state` is to itself.
    pub fn is_absorbing(&self, state: usize) -> bool {
        self.values[(state, state)] == 1.0
            && self
                .values
                .row(state)
                .iter()
                .enumerate()
                .all(|(j, &p)| j == state || p == 0.0)
    }

    /// Turns every all-zero row into an absorbing state (`P[i, i] = 1`).
    ///
    /// Returns the repaired state indices.
    pub fn repair_absorbing(&mut self) -> Vec<usize> {
        let repaired: Vec<usize> = (0..self.num_states())
            .filter(|&i| self.row_sum(i) == 0.0)
            .collect();
        for &i in &repaired {
            self.values[(i, i)] = 1.0;
        }
        repaired
    }

    /// Whether every row sums to 1 within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        (0..self.num_states()).all(|i| (self.row_sum(i) - 1.0).abs() <= tolerance)
    }

    /// States reachable from `state` with non-zero probability, ascending.
    /// Self-loops are never structural edges.
    pub fn children(&self, state: usize) -> Vec<usize> {
        self.values
            .row(state)
            .iter()
            .enumerate()
            .filter(|&(j, &p)| j != state && p != 0.0)
            .map(|(j, _)| j)
            .collect()
    }

    /// Extends the matrix with one absorbing state per leaf row.
    ///
    /// `parents[j]` is the label leaf `j` hangs under (its value in the last
    /// hierarchy column). A parent whose row is absorbing gives up its
    /// self-loop; each parent's remaining probability mass is spread evenly
    /// over its leaves. Leaves whose parent is unknown stay unreachable.
    /// Leaf states follow the existing states, in `parents` order.
    pub fn with_leaves(&self, parents: &[Option<&str>]) -> TransitionMatrix {
        let n = self.num_states();
        let total = n + parents.len();

        let mut values = DMatrix::zeros(total, total);
        for i in 0..n {
            for j in 0..n {
                values[(i, j)] = self.values[(i, j)];
            }
        }

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (leaf, parent) in parents.iter().enumerate() {
            if let Some(p) = parent.and_then(|label| self.index_of(label)) {
                groups[p].push(leaf);
            }
        }

        for (p, leaves) in groups.iter().enumerate() {
            if leaves.is_empty() {
                continue;
            }
            if self.is_absorbing(p) {
                values[(p, p)] = 0.0;
            }
            let free = (1.0 - values.row(p).sum()).max(0.0);
            if free == 0.0 {
                continue;
            }
            let share = free / leaves.len() as f64;
            for &leaf in leaves {
                values[(p, n + leaf)] = share;
            }
        }

        let labels = self
            .labels
            .iter()
            .cloned()
            .chain((0..parents.len()).map(|j| format!("row:{j}")))
            .collect();

        let mut extended = TransitionMatrix { labels, values };
        extended.repair_absorbing();
        extended
    }
}
