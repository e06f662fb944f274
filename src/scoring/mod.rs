//! Column-weighted utility scoring.
//!
//! Each weighted column contributes additively to a row's utility:
//!
//! - numeric columns are min-max normalised into `[0, 1]`, flipped for
//!   columns where lower is better ([`LOWER_IS_BETTER`])
//! - categorical columns score the full weight on a match with the chosen
//!   constraint value, or on every row when nothing is chosen
//!
//! Column kinds are decided once per table by [`UtilityScorer::plan`].

mod engine;
mod normalize;

pub use engine::{weighted_utility, ScoreTerm, UtilityScorer};
pub use normalize::{normalize, Direction, LOWER_IS_BETTER};
