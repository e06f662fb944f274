//! Value iteration for a Markov reward process.
//!
//! With a single fixed stochastic transition model there is no action
//! choice; the solver computes the discounted long-run utility
//!
//! ```text
//! U = R + gamma * P U
//! ```
//!
//! by synchronous (Jacobi-style) sweeps from `U = 0`. For `gamma < 1` and a
//! row-stochastic `P` the update is a contraction, so the sweeps converge to
//! the unique fixed point.
//!
//! # References
//!
//! - Bellman (1957), "Dynamic Programming"
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction", ch. 4

mod config;
mod runner;

pub use config::ValueIterationConfig;
pub use runner::{ValueIterationResult, ValueIterationRunner};
