//! Multi-key descending order over graph states.

use std::cmp::Ordering;

use crate::graph::{Graph, State};
use crate::table::parse_number;

/// A key states are ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// The state's solved utility.
    Utility,

    /// A column of the state's bound row, resolved like constraint keys.
    Column(String),
}

/// Ranks states by an ordered list of keys, best first.
///
/// Keys are compared in order and the first one that separates two states
/// decides. Every key is a total order, so any state set sorts
/// consistently:
///
/// - Utilities compare by value, with `NaN` ranking last.
/// - Column cells compare numerically when both parse. A numeric cell ranks
///   before a text cell, and two text cells compare as strings.
/// - On a column key, states without a bound row rank after those with one.
///   A column that does not resolve separates no states.
///
/// Ties keep their input order.
#[derive(Debug, Clone)]
pub struct RankingComparator {
    keys: Vec<SortKey>,
}

impl RankingComparator {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// `Ordering::Less` when `a` ranks before `b`.
    pub fn compare(&self, graph: &Graph<'_>, a: &State, b: &State) -> Ordering {
        for key in &self.keys {
            let ordering = match key {
                SortKey::Utility => descending(a.utility_value(), b.utility_value()),
                SortKey::Column(name) => compare_cells(graph, name, a, b),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable sort of `states`; returns their keys in rank order.
    pub fn sort(&self, graph: &Graph<'_>, states: &[State]) -> Vec<usize> {
        let mut ranked: Vec<&State> = states.iter().collect();
        ranked.sort_by(|a, b| self.compare(graph, a, b));
        ranked.into_iter().map(State::key).collect()
    }
}

/// Larger first; `NaN` last.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn compare_cells(graph: &Graph<'_>, name: &str, a: &State, b: &State) -> Ordering {
    let Some(col) = graph.leaf_rows().resolve_column(name) else {
        return Ordering::Equal;
    };
    let (row_a, row_b) = match (graph.row(a), graph.row(b)) {
        (Some(row_a), Some(row_b)) => (row_a, row_b),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => return Ordering::Equal,
    };
    let (cell_a, cell_b) = (row_a[col].as_str(), row_b[col].as_str());
    match (parse_number(cell_a), parse_number(cell_b)) {
        (Some(x), Some(y)) => descending(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => cell_b.cmp(cell_a),
    }
}

impl Default for RankingComparator {
    fn default() -> Self {
        Self::new(vec![SortKey::Utility])
    }
}
