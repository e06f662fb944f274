//! Decision graph state.

/// A node of the decision graph.
///
/// States live in an arena owned by [`Graph`](super::Graph) and refer to
/// each other by index. A state bound to a table row is a leaf; every other
/// state is an inner decision node.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub(crate) key: usize,
    pub(crate) children: Vec<usize>,
    pub(crate) reward: f64,
    pub(crate) utility_value: f64,
    pub(crate) row: Option<usize>,
}

impl State {
    /// Index of the state in the arena and in the transition matrix.
    pub fn key(&self) -> usize {
        self.key
    }

    /// States reachable with non-zero probability, ascending.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Solved utility; 0 until the graph is solved.
    pub fn utility_value(&self) -> f64 {
        self.utility_value
    }

    /// Index of the bound row in the leaf table.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn is_leaf(&self) -> bool {
        self.row.is_some()
    }
}
