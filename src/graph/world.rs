//! Graph construction and solving.

use super::rewards::RewardFunction;
use super::types::State;
use crate::error::{Error, Result};
use crate::solver::{ValueIterationConfig, ValueIterationResult, ValueIterationRunner};
use crate::table::Table;
use crate::transition::TransitionMatrix;

/// Decision graph over the states of a transition matrix.
///
/// The first `inner_node_count` states are inner nodes; the remaining
/// states are leaves bound, in order, to the rows of `leaf_rows`.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    transitions: &'a TransitionMatrix,
    leaf_rows: &'a Table,
    states: Vec<State>,
    inner_node_count: usize,
}

impl<'a> Graph<'a> {
    /// Builds the state arena.
    ///
    /// # Errors
    ///
    /// - [`Error::NegativeInnerNodeCount`] if `leaf_rows` has more rows than
    ///   the matrix has states
    /// - [`Error::LengthMismatch`] if `rewards` does not cover every state
    ///
    /// # Examples
    ///
    /// ```
    /// use u_mrprank::graph::{Graph, RewardFunction};
    /// use u_mrprank::table::Table;
    /// use u_mrprank::transition::TransitionMatrix;
    ///
    /// let matrix = TransitionMatrix::zeros(vec!["root".into()]);
    /// let rows = Table::from_rows(vec!["model".into()], vec![vec!["resnet".into()]]).unwrap();
    /// let matrix = matrix.with_leaves(&[Some("root")]);
    ///
    /// let rewards = RewardFunction::new(vec![0.0, 1.0]);
    /// let graph = Graph::build(&matrix, &rows, &rewards).unwrap();
    /// assert_eq!(graph.inner_node_count(), 1);
    /// assert_eq!(graph.states()[0].children(), &[1]);
    /// ```
    pub fn build(
        transitions: &'a TransitionMatrix,
        leaf_rows: &'a Table,
        rewards: &RewardFunction,
    ) -> Result<Self> {
        let num_states = transitions.num_states();
        let inner_node_count =
            num_states
                .checked_sub(leaf_rows.len())
                .ok_or(Error::NegativeInnerNodeCount {
                    states: num_states,
                    leaves: leaf_rows.len(),
                })?;
        check_len("reward function", num_states, rewards.len())?;

        let states = (0..num_states)
            .map(|key| State {
                key,
                children: transitions.children(key),
                reward: rewards.values()[key],
                utility_value: 0.0,
                row: key.checked_sub(inner_node_count),
            })
            .collect();

        Ok(Self {
            transitions,
            leaf_rows,
            states,
            inner_node_count,
        })
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn inner_node_count(&self) -> usize {
        self.inner_node_count
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, key: usize) -> Option<&State> {
        self.states.get(key)
    }

    /// Inner states, in key order.
    pub fn inner_nodes(&self) -> &[State] {
        &self.states[..self.inner_node_count]
    }

    /// Leaf states, in row order.
    pub fn leaves(&self) -> &[State] {
        &self.states[self.inner_node_count..]
    }

    pub fn transitions(&self) -> &'a TransitionMatrix {
        self.transitions
    }

    pub fn leaf_rows(&self) -> &'a Table {
        self.leaf_rows
    }

    /// The row bound to `state`, if it is a leaf.
    pub fn row(&self, state: &State) -> Option<&'a [String]> {
        state.row.and_then(|r| self.leaf_rows.row(r))
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.states.iter().map(State::reward).collect()
    }

    pub fn utility_values(&self) -> Vec<f64> {
        self.states.iter().map(State::utility_value).collect()
    }

    /// Replaces every state's reward.
    pub fn set_rewards(&mut self, rewards: &RewardFunction) -> Result<()> {
        check_len("reward function", self.states.len(), rewards.len())?;
        for (state, &r) in self.states.iter_mut().zip(rewards.values()) {
            state.reward = r;
        }
        Ok(())
    }

    /// Replaces every state's utility.
    pub fn set_utility_values(&mut self, values: &[f64]) -> Result<()> {
        check_len("utility vector", self.states.len(), values.len())?;
        for (state, &u) in self.states.iter_mut().zip(values) {
            state.utility_value = u;
        }
        Ok(())
    }

    /// Runs value iteration over the graph's rewards and transitions and
    /// stores the resulting utilities on the states.
    pub fn solve(&mut self, config: &ValueIterationConfig) -> Result<ValueIterationResult> {
        let result = ValueIterationRunner::run(&self.rewards(), self.transitions.values(), config)?;
        self.set_utility_values(&result.utilities)?;
        Ok(result)
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, ConstraintMap, RewardValues};

    fn rows() -> Table {
        Table::from_rows(
            vec!["model".into(), "processing_unit".into()],
            vec![
                vec!["resnet".into(), "GPU".into()],
                vec!["vit".into(), "CPU".into()],
                vec!["resnet".into(), "CPU".into()],
            ],
        )
        .unwrap()
    }

    fn model_matrix() -> TransitionMatrix {
        let mut m = TransitionMatrix::zeros(vec!["vision".into(), "resnet".into(), "vit".into()]);
        m.set(0, 1, 0.6);
        m.set(0, 2, 0.4);
        m.repair_absorbing();
        m.with_leaves(&[Some("resnet"), Some("vit"), Some("resnet")])
    }

    #[test]
    fn test_build_layout() {
        let matrix = model_matrix();
        let table = rows();
        let rewards = RewardFunction::new(vec![0.0; 6]);
        let graph = Graph::build(&matrix, &table, &rewards).unwrap();

        assert_eq!(graph.num_states(), 6);
        assert_eq!(graph.inner_node_count(), 3);
        assert!(graph.inner_nodes().iter().all(|s| !s.is_leaf()));
        let leaf_rows: Vec<_> = graph.leaves().iter().map(|s| s.row()).collect();
        assert_eq!(leaf_rows, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(graph.row(&graph.states()[4]).unwrap()[0], "vit");
    }

    #[test]
    fn test_children_ascending_without_self_loops() {
        let matrix = model_matrix();
        let table = rows();
        let graph = Graph::build(&matrix, &table, &RewardFunction::new(vec![0.0; 6])).unwrap();

        assert_eq!(graph.states()[0].children(), &[1, 2]);
        assert_eq!(graph.states()[1].children(), &[3, 5]);
        assert_eq!(graph.states()[2].children(), &[4]);
        assert!(graph.leaves().iter().all(|s| s.children().is_empty()));
    }

    #[test]
    fn test_negative_inner_node_count_raises() {
        let matrix = TransitionMatrix::zeros(vec!["a".into(), "b".into()]);
        let table = rows();
        let err = Graph::build(&matrix, &table, &RewardFunction::new(vec![0.0; 2])).unwrap_err();
        assert!(matches!(
            err,
            Error::NegativeInnerNodeCount { states: 2, leaves: 3 }
        ));
    }

    #[test]
    fn test_setters_validate_length() {
        let matrix = model_matrix();
        let table = rows();
        let mut graph = Graph::build(&matrix, &table, &RewardFunction::new(vec![0.0; 6])).unwrap();

        assert!(matches!(
            graph.set_rewards(&RewardFunction::new(vec![1.0; 5])),
            Err(Error::LengthMismatch { expected: 6, got: 5, .. })
        ));
        assert!(graph.set_utility_values(&[0.0; 7]).is_err());
        graph.set_utility_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(graph.state(5).unwrap().utility_value(), 6.0);
    }

    #[test]
    fn test_solve_propagates_leaf_rewards() {
        let matrix = model_matrix();
        let table = rows();
        let constraints = ConstraintMap::new().with("processing_unit", Constraint::equals("GPU"));
        let rewards =
            RewardFunction::from_constraints(6, &table, &constraints, &RewardValues::new()).unwrap();
        let mut graph = Graph::build(&matrix, &table, &rewards).unwrap();

        let config = ValueIterationConfig::default().with_theta(1e-10);
        let result = graph.solve(&config).unwrap();
        assert!(result.converged);

        let u = graph.utility_values();
        // Leaf 3 (GPU) is absorbing with reward 1.
        assert!((u[3] - 10.0).abs() < 1e-6);
        assert!(u[4].abs() < 1e-9);
        // resnet splits evenly over leaves 3 and 5.
        assert!((u[1] - 0.9 * 0.5 * 10.0).abs() < 1e-6);
        assert!((u[0] - 0.9 * 0.6 * u[1]).abs() < 1e-6);
    }
}
