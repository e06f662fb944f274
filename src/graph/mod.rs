//! Decision graph for Markov reward process valuation.
//!
//! A [`Graph`] is an arena of [`State`]s indexed exactly like the rows of
//! its [`TransitionMatrix`](crate::transition::TransitionMatrix): inner
//! decision states first, then one leaf state per candidate row. Edges are
//! the non-zero off-diagonal transitions.
//!
//! # Key Types
//!
//! - [`Graph`]: State arena plus borrowed transitions and leaf rows
//! - [`RewardFunction`]: One reward per state, zero for inner states
//! - [`leaf_rewards`]: Per-row reward from constraint matches

mod rewards;
mod types;
mod world;

pub use rewards::{leaf_rewards, RewardFunction};
pub use types::State;
pub use world::Graph;
