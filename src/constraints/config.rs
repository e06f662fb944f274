//! JSON constraints configuration.
//!
//! The configuration file holds two co-located mappings:
//!
//! ```json
//! {
//!   "constraints_map": { "processing_unit": "GPU", "f1_score": [0.7, null] },
//!   "reward_values":   { "f1_score": 3, "accuracy": [0, 2] }
//! }
//! ```
//!
//! Every entry is shaped into a [`Constraint`] or [`RewardValue`] here, once.
//! Entries that cannot be shaped are dropped with a debug event.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::{Constraint, ConstraintMap, RewardValue, RewardValues};
use crate::error::{Error, Result};
use crate::table::parse_number;

/// Parsed hard constraints and reward values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintsConfig {
    pub constraints: ConstraintMap,
    pub rewards: RewardValues,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    constraints_map: Option<Map<String, Value>>,
    #[serde(default)]
    reward_values: Option<Map<String, Value>>,
}

impl ConstraintsConfig {
    /// Parses the configuration from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(raw)?;
        Ok(Self::from_raw(raw))
    }

    /// Parses the configuration from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawConfig = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut constraints = ConstraintMap::new();
        for (column, value) in raw.constraints_map.unwrap_or_default() {
            match parse_constraint(&value) {
                Some(constraint) => constraints.insert(column, constraint),
                None => tracing::debug!(column = %column, value = %value, "Constraint dropped."),
            }
        }

        let mut rewards = RewardValues::new();
        for (column, value) in raw.reward_values.unwrap_or_default() {
            match parse_reward_value(&value) {
                Some(reward) => rewards.insert(column, reward),
                None => tracing::debug!(column = %column, value = %value, "Reward value dropped."),
            }
        }

        Self {
            constraints,
            rewards,
        }
    }
}

/// Reads and parses a constraints configuration file.
pub fn load(path: &Path) -> Result<ConstraintsConfig> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    ConstraintsConfig::from_json_str(&raw)
}

fn parse_constraint(value: &Value) -> Option<Constraint> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            let (low, high) = (to_bound(&items[0]), to_bound(&items[1]));
            let pinned = match (stringify(&items[0]), stringify(&items[1])) {
                (Some(l), Some(h)) if l == h => Some(l),
                _ => None,
            };
            match (low, high, pinned) {
                // Same non-numeric value at both ends.
                (None, None, Some(value)) => Some(Constraint::equals(value)),
                (low, high, pinned) => Some(Constraint::Range { low, high, pinned }),
            }
        }
        Value::Array(items) => Some(Constraint::Categorical {
            values: items.iter().filter_map(stringify).collect(),
        }),
        Value::Null | Value::Object(_) => None,
        scalar => stringify(scalar).map(Constraint::equals),
    }
}

fn parse_reward_value(value: &Value) -> Option<RewardValue> {
    match value {
        Value::Array(items) if items.is_empty() => Some(RewardValue::new(0.0, 0.0)),
        Value::Array(items) => {
            if let [low, high] = items.as_slice() {
                if let (Some(low), Some(high)) = (to_weight(low), to_weight(high)) {
                    return Some(RewardValue::new(low, high));
                }
            }
            items
                .last()
                .and_then(to_weight)
                .map(|w| RewardValue::new(0.0, w))
        }
        other => to_weight(other).map(|w| RewardValue::new(0.0, w)),
    }
}

fn to_bound(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn to_weight(value: &Value) -> Option<f64> {
    to_bound(value).filter(|w| w.is_finite())
}

/// String form used for categorical comparison against table cells.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".into()),
        Value::Bool(false) => Some("False".into()),
        other => Some(other.to_string()),
    }
}
