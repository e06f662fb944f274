//! Value iteration loop.

use nalgebra::{DMatrix, DVector};

use super::config::ValueIterationConfig;
use crate::error::{Error, Result};

/// Result of a value iteration run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueIterationResult {
    /// Utility per state, from the last sweep.
    pub utilities: Vec<f64>,

    /// Number of sweeps performed.
    pub iterations: usize,

    /// Whether the sup-norm change fell below `theta`.
    pub converged: bool,

    /// Sup-norm change of the last sweep.
    pub delta: f64,

    /// Sup-norm change after each sweep.
    pub delta_history: Vec<f64>,
}

/// Solves `U = R + gamma * P U` for a fixed stochastic transition model.
pub struct ValueIterationRunner;

impl ValueIterationRunner {
    /// Runs synchronous value iteration from `U = 0`.
    ///
    /// Sweeps until the sup-norm change drops below `theta` or
    /// `max_iterations` sweeps have run; the last estimate is returned
    /// either way. `NaN` rewards count as 0.
    ///
    /// # Errors
    ///
    /// Configuration errors: a non-square matrix, a reward vector whose
    /// length differs from the number of states, or an invalid `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::DMatrix;
    /// use u_mrprank::solver::{ValueIterationConfig, ValueIterationRunner};
    ///
    /// // One absorbing state with reward 5.
    /// let p = DMatrix::from_element(1, 1, 1.0);
    /// let config = ValueIterationConfig::default().with_theta(1e-9);
    /// let result = ValueIterationRunner::run(&[5.0], &p, &config).unwrap();
    /// assert!((result.utilities[0] - 50.0).abs() < 1e-6);
    /// ```
    pub fn run(
        rewards: &[f64],
        transitions: &DMatrix<f64>,
        config: &ValueIterationConfig,
    ) -> Result<ValueIterationResult> {
        let n = transitions.nrows();
        if n != transitions.ncols() {
            return Err(Error::NonSquareMatrix {
                rows: n,
                cols: transitions.ncols(),
            });
        }
        if rewards.len() != n {
            return Err(Error::LengthMismatch {
                what: "reward vector",
                expected: n,
                got: rewards.len(),
            });
        }
        config.validate()?;

        let rewards = DVector::from_iterator(
            n,
            rewards.iter().map(|&r| if r.is_nan() { 0.0 } else { r }),
        );
        let mut utilities = DVector::<f64>::zeros(n);

        if n == 0 {
            return Ok(ValueIterationResult {
                utilities: Vec::new(),
                iterations: 0,
                converged: true,
                delta: 0.0,
                delta_history: Vec::new(),
            });
        }

        let mut delta = f64::INFINITY;
        let mut delta_history = Vec::new();

        for iteration in 1..=config.max_iterations {
            let next = &rewards + (transitions * &utilities) * config.gamma;
            delta = (&next - &utilities).amax();
            utilities = next;
            delta_history.push(delta);

            if delta < config.theta {
                tracing::debug!(
                    states = n,
                    iterations = iteration,
                    delta,
                    "Value iteration converged."
                );
                return Ok(ValueIterationResult {
                    utilities: utilities.iter().copied().collect(),
                    iterations: iteration,
                    converged: true,
                    delta,
                    delta_history,
                });
            }
        }

        tracing::debug!(
            states = n,
            iterations = config.max_iterations,
            delta,
            "Value iteration hit the iteration cap."
        );
        Ok(ValueIterationResult {
            utilities: utilities.iter().copied().collect(),
            iterations: config.max_iterations,
            converged: false,
            delta,
            delta_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> ValueIterationConfig {
        ValueIterationConfig::default()
            .with_theta(1e-10)
            .with_max_iterations(100_000)
    }

    fn bellman_residual(u: &[f64], r: &[f64], p: &DMatrix<f64>, gamma: f64) -> f64 {
        let u = DVector::from_column_slice(u);
        let r = DVector::from_column_slice(r);
        (&u - (r + (p * &u) * gamma)).amax()
    }

    #[test]
    fn test_absorbing_state_geometric_sum() {
        let p = DMatrix::from_element(1, 1, 1.0);
        let result = ValueIterationRunner::run(&[5.0], &p, &tight()).unwrap();
        assert!(result.converged);
        assert!((result.utilities[0] - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rewards_fixed_point_is_zero() {
        let p = DMatrix::from_row_slice(2, 2, &[0.5, 0.5, 0.0, 1.0]);
        let result = ValueIterationRunner::run(&[0.0, 0.0], &p, &tight()).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert!(result.utilities.iter().all(|&u| u == 0.0));
    }

    #[test]
    fn test_chain_satisfies_bellman_equation() {
        // root -> {a, b}, a and b absorbing
        let p = DMatrix::from_row_slice(3, 3, &[0.0, 0.6, 0.4, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let r = [0.0, 1.0, 2.0];
        let config = tight().with_gamma(0.9);
        let result = ValueIterationRunner::run(&r, &p, &config).unwrap();

        assert!(result.converged);
        assert!(bellman_residual(&result.utilities, &r, &p, 0.9) < config.theta);
        assert!((result.utilities[1] - 10.0).abs() < 1e-6);
        assert!((result.utilities[2] - 20.0).abs() < 1e-6);
        assert!((result.utilities[0] - 0.9 * (0.6 * 10.0 + 0.4 * 20.0)).abs() < 1e-6);
    }

    #[test]
    fn test_nan_rewards_count_as_zero() {
        let p = DMatrix::identity(2, 2);
        let result = ValueIterationRunner::run(&[f64::NAN, 1.0], &p, &tight()).unwrap();
        assert_eq!(result.utilities[0], 0.0);
        assert!((result.utilities[1] - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_cap_returns_last_estimate() {
        let p = DMatrix::from_element(1, 1, 1.0);
        let config = ValueIterationConfig::default()
            .with_gamma(0.99)
            .with_theta(1e-12)
            .with_max_iterations(3);
        let result = ValueIterationRunner::run(&[1.0], &p, &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert_eq!(result.delta_history.len(), 3);
        // 1 + 0.99 + 0.99^2
        assert!((result.utilities[0] - (1.0 + 0.99 + 0.9801)).abs() < 1e-12);
    }

    #[test]
    fn test_deltas_contract() {
        let p = DMatrix::from_row_slice(2, 2, &[0.2, 0.8, 0.5, 0.5]);
        let result = ValueIterationRunner::run(&[1.0, 3.0], &p, &tight()).unwrap();
        for pair in result.delta_history.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_square() {
        let p = DMatrix::zeros(2, 3);
        let err = ValueIterationRunner::run(&[0.0, 0.0], &p, &tight()).unwrap_err();
        assert!(matches!(err, Error::NonSquareMatrix { rows: 2, cols: 3 }));
    }

    #[test]
    fn test_rejects_reward_length_mismatch() {
        let p = DMatrix::identity(2, 2);
        let err = ValueIterationRunner::run(&[0.0], &p, &tight()).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_gamma() {
        let p = DMatrix::identity(1, 1);
        let config = tight().with_gamma(1.0);
        assert!(matches!(
            ValueIterationRunner::run(&[0.0], &p, &config),
            Err(Error::InvalidGamma(_))
        ));
    }

    #[test]
    fn test_empty_state_space() {
        let p = DMatrix::zeros(0, 0);
        let result = ValueIterationRunner::run(&[], &p, &tight()).unwrap();
        assert!(result.utilities.is_empty());
        assert!(result.converged);
    }
}
