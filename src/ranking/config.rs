//! Ranking pipeline configuration.

use std::path::PathBuf;

use super::comparator::SortKey;
use crate::error::Result;
use crate::solver::ValueIterationConfig;

/// Default categorical hierarchy, coarsest level first.
pub const DEFAULT_HIERARCHY: [&str; 3] = ["domain", "algorithm", "model"];

/// Configuration for [`RankingPipeline`](super::RankingPipeline).
///
/// # Examples
///
/// ```
/// use u_mrprank::ranking::RankingConfig;
///
/// let config = RankingConfig::default()
///     .with_top_k(10)
///     .with_hierarchy_columns(["domain", "model"])
///     .with_transition_path("models/graph_world.csv");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Categorical columns the transition model is estimated over.
    pub hierarchy_columns: Vec<String>,

    /// Rows kept after sorting; 0 keeps every row.
    pub top_k: usize,

    /// Where the estimated transition matrix is persisted and, if
    /// estimation fails, reread from.
    pub transition_path: Option<PathBuf>,

    /// Whether to run the graph valuation stage.
    pub graph_valuation: bool,

    /// Keys used to order the solved leaves.
    pub sort_keys: Vec<SortKey>,

    pub solver: ValueIterationConfig,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            hierarchy_columns: DEFAULT_HIERARCHY.iter().map(|c| c.to_string()).collect(),
            top_k: 0,
            transition_path: None,
            graph_valuation: true,
            sort_keys: vec![SortKey::Utility],
            solver: ValueIterationConfig::default(),
        }
    }
}

impl RankingConfig {
    pub fn with_hierarchy_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hierarchy_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_transition_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.transition_path = Some(path.into());
        self
    }

    pub fn with_graph_valuation(mut self, enabled: bool) -> Self {
        self.graph_valuation = enabled;
        self
    }

    pub fn with_sort_keys(mut self, keys: Vec<SortKey>) -> Self {
        self.sort_keys = keys;
        self
    }

    pub fn with_solver(mut self, solver: ValueIterationConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()
    }
}
