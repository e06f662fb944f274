//! Constraint-driven ranking of tabular candidates.
//!
//! Candidate configurations (for example, machine learning model setups)
//! arrive as a table. They are ranked against user-supplied hard
//! constraints and reward weights:
//!
//! - **Row filter**: hard constraints remove non-matching rows
//!   ([`constraints::filter`]).
//! - **Utility scorer**: weighted, min-max normalised numeric columns and
//!   matched categorical columns sum into one score per row ([`scoring`]).
//! - **Transition model**: `P(child | parent)` between adjacent categorical
//!   hierarchy levels, blending evidence from the filtered subset into the
//!   full table ([`transition`]).
//! - **Decision graph**: hierarchy values as inner states, candidate rows as
//!   leaves, with constraint-match rewards ([`graph`]).
//! - **Value iteration**: discounted long-run utility of every state
//!   ([`solver`]).
//! - **Ranking pipeline**: orchestrates the stages and sorts the result; the
//!   graph stage is auxiliary and never fails a request ([`ranking`]).
//!
//! # Example
//!
//! ```
//! use u_mrprank::constraints::ConstraintsConfig;
//! use u_mrprank::ranking::{RankingConfig, RankingPipeline};
//! use u_mrprank::table::Table;
//!
//! let table = Table::from_csv_reader(
//!     "domain,algorithm,model,f1_score\n\
//!      vision,classification,resnet,0.81\n\
//!      vision,classification,vit,0.88\n"
//!         .as_bytes(),
//! )
//! .unwrap();
//! let request = ConstraintsConfig::from_json_str(
//!     r#"{"constraints_map": {"domain": "vision"}, "reward_values": {"f1": 2}}"#,
//! )
//! .unwrap();
//!
//! let pipeline = RankingPipeline::new(RankingConfig::default()).unwrap();
//! let ranked = pipeline.run(&table, &request).unwrap();
//! assert_eq!(ranked.table.cell(0, 2), "vit");
//! ```

pub mod constraints;
pub mod error;
pub mod graph;
pub mod ranking;
pub mod scoring;
pub mod solver;
pub mod table;
pub mod transition;

pub use error::{Error, Result};
