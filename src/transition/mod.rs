//! Transition model over categorical hierarchy levels.
//!
//! Candidate configurations are organised by an ordered list of categorical
//! columns (for example `domain → algorithm → model`). Every distinct value
//! of those columns is a state; [`estimate`] derives `P(child | parent)`
//! between adjacent levels from a full reference table, blending in the
//! evidence of a filtered subset with weight `alpha = |subset| / |full|`.
//!
//! # Key Types
//!
//! - [`TransitionMatrix`]: Labeled square matrix, row-indexed by state
//! - [`TransitionEstimate`]: Estimated matrix plus per-level labels and `alpha`
//!
//! States whose row is empty after estimation are made absorbing
//! (`P[i, i] = 1`), so the matrix handed to the solver is row-stochastic.
//! The matrix can be persisted as a labeled CSV artifact and read back.
//!
//! # References
//!
//! Puterman (1994), *Markov Decision Processes*, ch. 2 (Markov reward processes)

mod estimator;
mod matrix;
mod store;

pub use estimator::{estimate, Level, TransitionEstimate};
pub use matrix::TransitionMatrix;
