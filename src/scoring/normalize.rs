//! Min-max normalisation with a per-column direction.

/// Columns where a smaller value is better.
pub const LOWER_IS_BETTER: &[&str] = &["loss", "training_time"];

/// Whether larger or smaller values of a column are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    /// Direction of a (resolved) column name.
    pub fn for_column(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if LOWER_IS_BETTER.contains(&lowered.as_str()) {
            Direction::LowerIsBetter
        } else {
            Direction::HigherIsBetter
        }
    }
}

/// Maps a numeric column into `[0, 1]`, best value at 1.
///
/// Missing and non-finite cells map to 0. A column with a single distinct
/// value maps to 1 (0 when lower is better); a column with no value maps to
/// all zeros.
///
/// # Examples
///
/// ```
/// use u_mrprank::scoring::{normalize, Direction};
///
/// let values = [Some(0.8), Some(0.6), None];
/// assert_eq!(normalize(&values, Direction::HigherIsBetter), vec![1.0, 0.0, 0.0]);
/// assert_eq!(normalize(&values, Direction::LowerIsBetter), vec![0.0, 1.0, 0.0]);
/// ```
pub fn normalize(values: &[Option<f64>], direction: Direction) -> Vec<f64> {
    let finite = |v: &Option<f64>| v.filter(|x| x.is_finite());

    let Some((min, max)) = values.iter().filter_map(finite).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) else {
        return vec![0.0; values.len()];
    };

    let span = max - min;
    values
        .iter()
        .map(|v| match finite(v) {
            None => 0.0,
            Some(_) if span == 0.0 => match direction {
                Direction::HigherIsBetter => 1.0,
                Direction::LowerIsBetter => 0.0,
            },
            Some(x) => match direction {
                Direction::HigherIsBetter => (x - min) / span,
                Direction::LowerIsBetter => (max - x) / span,
            },
        })
        .collect()
}
