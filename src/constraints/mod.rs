//! Hard constraints, soft reward values, and the row filter.
//!
//! A [`ConstraintMap`] maps column names to a [`Constraint`]. Each entry is
//! shaped once when the configuration is parsed:
//!
//! - `[low, high]` becomes [`Constraint::Range`] (open ends as `None`)
//! - `["abc", "abc"]`, the same non-numeric value at both ends, becomes
//!   equality
//! - any other list, or a scalar, becomes [`Constraint::Categorical`]
//!
//! Categorical values match cells numerically when both sides parse as
//! numbers, so `0.8` selects a cell written `0.80`.
//!
//! [`RewardValues`] maps columns to a `(low, high)` [`RewardValue`] used both
//! as leaf rewards in the decision graph and, through its `high` end, as the
//! column weight in weighted scoring.
//!
//! [`filter`] applies the hard constraints to a table.

mod config;
mod filter;
mod types;

pub use config::{load, ConstraintsConfig};
pub use filter::filter;
pub use types::{cell_equals, Constraint, ConstraintMap, RewardValue, RewardValues};
