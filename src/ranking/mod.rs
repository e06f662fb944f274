//! Ranking pipeline.
//!
//! [`RankingPipeline::run`] filters a candidate table, scores the surviving
//! rows with the column-weighted utility, and sorts them in descending
//! order. An auxiliary stage estimates a transition model over the
//! hierarchy columns, attaches the rows as leaves of a decision graph and
//! solves it; its outcome is reported as a [`Valuation`] and, when solved,
//! as an extra `graph_utility` column. That stage never fails the request.
//!
//! # Key Types
//!
//! - [`RankingConfig`]: Hierarchy, truncation, persistence and solver settings
//! - [`RankingComparator`]: Multi-key ordering of solved states
//! - [`RankedOutput`]: Ranked table plus the valuation outcome

mod comparator;
mod config;
mod pipeline;

pub use comparator::{RankingComparator, SortKey};
pub use config::{RankingConfig, DEFAULT_HIERARCHY};
pub use pipeline::{
    GraphValuation, RankedOutput, RankingPipeline, Valuation, GRAPH_UTILITY_COLUMN,
    UTILITY_COLUMN,
};
