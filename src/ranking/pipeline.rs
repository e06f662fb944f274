//! Filter, score, value and sort.

use super::comparator::RankingComparator;
use super::config::RankingConfig;
use crate::constraints::{filter, ConstraintsConfig};
use crate::error::Result;
use crate::graph::{Graph, RewardFunction};
use crate::scoring::weighted_utility;
use crate::table::Table;
use crate::transition::{estimate, TransitionMatrix};

/// Column holding the weighted utility a table is ranked by.
pub const UTILITY_COLUMN: &str = "utility_value";

/// Column holding the solved graph utility of each row.
pub const GRAPH_UTILITY_COLUMN: &str = "graph_utility";

/// Solved graph valuation of the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphValuation {
    /// Utility of each filtered row, in filtered (pre-sort) order.
    pub utilities_by_row: Vec<f64>,

    /// Utility of each hierarchy value state.
    pub label_utilities: Vec<(String, f64)>,

    /// Filtered row indices ordered by the configured sort keys.
    pub leaf_order: Vec<usize>,

    pub iterations: usize,
    pub converged: bool,
}

/// Outcome of the auxiliary graph valuation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Valuation {
    Solved(GraphValuation),

    /// The stage ran and failed, or had nothing to value.
    Skipped { reason: String },

    /// Disabled by configuration.
    NotRequested,
}

impl Valuation {
    pub fn solved(&self) -> Option<&GraphValuation> {
        match self {
            Valuation::Solved(v) => Some(v),
            _ => None,
        }
    }
}

/// Result of one ranking request.
#[derive(Debug, Clone)]
pub struct RankedOutput {
    /// Filtered rows sorted by descending utility, truncated to `top_k`,
    /// with a [`UTILITY_COLUMN`] and, when valuation succeeded, a
    /// [`GRAPH_UTILITY_COLUMN`].
    pub table: Table,

    /// Rows that passed the filter, before truncation.
    pub filtered_rows: usize,

    pub valuation: Valuation,
}

/// Ranking pipeline: filter, weighted scoring, optional graph valuation,
/// merge and sort.
///
/// # Examples
///
/// ```
/// use u_mrprank::constraints::{ConstraintMap, ConstraintsConfig, RewardValues};
/// use u_mrprank::ranking::{RankingConfig, RankingPipeline};
/// use u_mrprank::table::Table;
///
/// let table = Table::from_rows(
///     vec!["f1_score".into(), "processing_unit".into()],
///     vec![
///         vec!["0.6".into(), "CPU".into()],
///         vec!["0.8".into(), "GPU".into()],
///     ],
/// )
/// .unwrap();
/// let request = ConstraintsConfig {
///     constraints: ConstraintMap::new(),
///     rewards: RewardValues::new().with_weight("f1_score", 3.0),
/// };
///
/// let pipeline = RankingPipeline::new(RankingConfig::default()).unwrap();
/// let ranked = pipeline.run(&table, &request).unwrap();
/// assert_eq!(ranked.table.cell(0, 1), "GPU");
/// ```
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    config: RankingConfig,
}

impl RankingPipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: RankingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Ranks the rows of `table` that satisfy `request`.
    ///
    /// An empty filter result is a valid outcome and yields an empty table.
    /// The graph valuation stage never fails the request; its errors are
    /// logged and reported as [`Valuation::Skipped`].
    ///
    /// # Errors
    ///
    /// Only if the output table cannot be assembled.
    pub fn run(&self, table: &Table, request: &ConstraintsConfig) -> Result<RankedOutput> {
        let filtered = filter(table, &request.constraints);
        tracing::info!(rows = table.len(), kept = filtered.len(), "Constraints applied.");

        if filtered.is_empty() {
            let mut empty = filtered;
            empty.set_numeric_column(UTILITY_COLUMN, &[])?;
            let valuation = if self.config.graph_valuation {
                Valuation::Skipped {
                    reason: "no rows satisfy the constraints".into(),
                }
            } else {
                Valuation::NotRequested
            };
            return Ok(RankedOutput {
                table: empty,
                filtered_rows: 0,
                valuation,
            });
        }

        let scores = weighted_utility(&filtered, &request.rewards, &request.constraints);

        let valuation = if self.config.graph_valuation {
            match self.value_graph(table, &filtered, request) {
                Ok(valuation) => Valuation::Solved(valuation),
                Err(err) => {
                    tracing::warn!(error = %err, "Graph valuation skipped.");
                    Valuation::Skipped {
                        reason: err.to_string(),
                    }
                }
            }
        } else {
            Valuation::NotRequested
        };

        let mut order: Vec<usize> = (0..filtered.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut ranked = filtered.select(&order);
        let ranked_scores: Vec<f64> = order.iter().map(|&i| scores[i]).collect();
        ranked.set_numeric_column(UTILITY_COLUMN, &ranked_scores)?;
        if let Valuation::Solved(solved) = &valuation {
            let utilities: Vec<f64> = order.iter().map(|&i| solved.utilities_by_row[i]).collect();
            ranked.set_numeric_column(GRAPH_UTILITY_COLUMN, &utilities)?;
        }
        if self.config.top_k > 0 {
            ranked.truncate(self.config.top_k);
        }

        tracing::info!(
            ranked = ranked.len(),
            filtered = filtered.len(),
            valued = valuation.solved().is_some(),
            "Ranking complete."
        );

        Ok(RankedOutput {
            table: ranked,
            filtered_rows: filtered.len(),
            valuation,
        })
    }

    /// Ranks several independent requests against the same table.
    ///
    /// Requests run in parallel with the `parallel` feature.
    pub fn run_batch(
        &self,
        table: &Table,
        requests: &[ConstraintsConfig],
    ) -> Vec<Result<RankedOutput>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests.par_iter().map(|r| self.run(table, r)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|r| self.run(table, r)).collect()
        }
    }

    /// Estimates or reloads the transition model, attaches the filtered
    /// rows as leaves and solves the graph.
    fn value_graph(
        &self,
        full: &Table,
        filtered: &Table,
        request: &ConstraintsConfig,
    ) -> Result<GraphValuation> {
        let transitions = self.transition_model(full, filtered)?;

        let parent_col = self
            .config
            .hierarchy_columns
            .last()
            .and_then(|c| filtered.resolve_column(c));
        let parents: Vec<Option<&str>> = filtered
            .rows()
            .iter()
            .map(|row| parent_col.map(|c| row[c].as_str()).filter(|v| !v.is_empty()))
            .collect();
        let extended = transitions.with_leaves(&parents);

        let rewards = RewardFunction::from_constraints(
            extended.num_states(),
            filtered,
            &request.constraints,
            &request.rewards,
        )?;
        let mut graph = Graph::build(&extended, filtered, &rewards)?;
        let result = graph.solve(&self.config.solver)?;

        let comparator = RankingComparator::new(self.config.sort_keys.clone());
        let inner = graph.inner_node_count();
        let leaf_order = comparator
            .sort(&graph, graph.leaves())
            .into_iter()
            .map(|key| key - inner)
            .collect();

        Ok(GraphValuation {
            utilities_by_row: graph.leaves().iter().map(|s| s.utility_value()).collect(),
            label_utilities: transitions
                .labels()
                .iter()
                .cloned()
                .zip(graph.inner_nodes().iter().map(|s| s.utility_value()))
                .collect(),
            leaf_order,
            iterations: result.iterations,
            converged: result.converged,
        })
    }

    /// Best-effort transition model: a fresh estimate, persisted when a
    /// path is configured, or the persisted matrix when estimation fails.
    fn transition_model(&self, full: &Table, filtered: &Table) -> Result<TransitionMatrix> {
        let path = self.config.transition_path.as_deref();
        match estimate(full, filtered, &self.config.hierarchy_columns) {
            Ok(estimated) => {
                if let Some(path) = path {
                    if let Err(err) = estimated.matrix.write_csv(path) {
                        tracing::warn!(
                            path = %path.display(),
                            error = %err,
                            "Transition matrix not persisted."
                        );
                    }
                }
                Ok(estimated.matrix)
            }
            Err(err) => match path {
                Some(path) if path.exists() => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Estimation failed; reusing persisted transition matrix."
                    );
                    TransitionMatrix::read_csv(path)
                }
                _ => Err(err),
            },
        }
    }
}
