//! Constraint and reward value types.

use crate::table::parse_number;

/// A hard constraint on one column, shaped once at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Inclusive range `[low, high]`; `None` leaves that end open.
    ///
    /// `pinned` carries the shared string form when both ends were given
    /// and are equal (`[5, 5]`). Non-numeric columns fall back to equality
    /// on it, and a range with both ends open always matches on it.
    Range {
        low: Option<f64>,
        high: Option<f64>,
        pinned: Option<String>,
    },

    /// Membership in a set of stringified values. A scalar constraint is
    /// a one-element set.
    Categorical { values: Vec<String> },
}

impl Constraint {
    /// A numeric range.
    pub fn range(low: Option<f64>, high: Option<f64>) -> Self {
        Constraint::Range {
            low,
            high,
            pinned: None,
        }
    }

    /// Equality with a single value.
    pub fn equals(value: impl Into<String>) -> Self {
        Constraint::Categorical {
            values: vec![value.into()],
        }
    }

    /// Membership in a set of values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::Categorical {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a cell satisfies the constraint's chosen categorical value.
    ///
    /// Returns `None` when the constraint carries no categorical choice
    /// (an open numeric range).
    pub fn chosen_match(&self, cell: &str) -> Option<bool> {
        match self {
            Constraint::Categorical { values } => {
                Some(values.iter().any(|v| cell_equals(cell, v)))
            }
            Constraint::Range {
                pinned: Some(value),
                ..
            } => Some(cell_equals(cell, value)),
            Constraint::Range { pinned: None, .. } => None,
        }
    }
}

/// Equality between a table cell and a constraint value.
///
/// Numeric when both sides parse (`"0.80"` equals `"0.8"`), string
/// equality otherwise.
pub fn cell_equals(cell: &str, value: &str) -> bool {
    if cell == value {
        return true;
    }
    matches!((parse_number(cell), parse_number(value)), (Some(a), Some(b)) if a == b)
}

/// Constraints keyed by (unresolved) column name, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintMap {
    entries: Vec<(String, Constraint)>,
}

impl ConstraintMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, constraint: Constraint) -> Self {
        self.insert(column, constraint);
        self
    }

    /// Inserts or replaces the constraint for `column`.
    pub fn insert(&mut self, column: impl Into<String>, constraint: Constraint) {
        let column = column.into();
        match self.entries.iter_mut().find(|(k, _)| *k == column) {
            Some(entry) => entry.1 = constraint,
            None => self.entries.push((column, constraint)),
        }
    }

    /// The constraint stored under exactly this key.
    pub fn get(&self, column: &str) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, c)| c)
    }

    /// The constraint whose key resolves to column `col` of `columns`.
    pub fn for_column(&self, columns: &[String], col: usize) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(k, _)| crate::table::resolve_column(columns, k) == Some(col))
            .map(|(_, c)| c)
    }

    /// Entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewards granted to a row that fails (`low`) or satisfies (`high`) a
/// soft constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardValue {
    pub low: f64,
    pub high: f64,
}

impl RewardValue {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Weight used by the column-weighted scorer.
    pub fn weight(&self) -> f64 {
        self.high
    }
}

impl Default for RewardValue {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
        }
    }
}

/// Reward values keyed by (unresolved) column name, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardValues {
    entries: Vec<(String, RewardValue)>,
}

impl RewardValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: RewardValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Builder-style insert of a bare weight, i.e. `(0, weight)`.
    pub fn with_weight(self, column: impl Into<String>, weight: f64) -> Self {
        self.with(column, RewardValue::new(0.0, weight))
    }

    pub fn insert(&mut self, column: impl Into<String>, value: RewardValue) {
        let column = column.into();
        match self.entries.iter_mut().find(|(k, _)| *k == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// The reward value for `column`, if configured.
    pub fn get(&self, column: &str) -> Option<RewardValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| *v)
    }

    /// The reward value for `key`, falling back to the resolved column
    /// name, then to the `(0, 1)` default.
    pub fn get_or_default(&self, key: &str, resolved: &str) -> RewardValue {
        self.get(key)
            .or_else(|| self.get(resolved))
            .unwrap_or_default()
    }

    /// Entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RewardValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
