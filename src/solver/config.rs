//! Value iteration configuration.

use crate::error::{Error, Result};

/// Configuration for [`ValueIterationRunner`](super::ValueIterationRunner).
///
/// # Examples
///
/// ```
/// use u_mrprank::solver::ValueIterationConfig;
///
/// let config = ValueIterationConfig::default()
///     .with_gamma(0.95)
///     .with_theta(1e-6)
///     .with_max_iterations(5_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIterationConfig {
    /// Discount factor in `[0, 1)`.
    ///
    /// Values close to 1 weigh distant rewards more and need more
    /// iterations to converge.
    pub gamma: f64,

    /// Convergence threshold on the sup-norm change between sweeps.
    pub theta: f64,

    /// Hard cap on the number of sweeps.
    pub max_iterations: usize,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 0.005,
            max_iterations: 10_000,
        }
    }
}

impl ValueIterationConfig {
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(Error::InvalidGamma(self.gamma));
        }
        if !(self.theta > 0.0) {
            return Err(Error::InvalidTheta(self.theta));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidMaxIterations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValueIterationConfig::default();
        assert!((config.gamma - 0.9).abs() < 1e-15);
        assert!((config.theta - 0.005).abs() < 1e-15);
        assert_eq!(config.max_iterations, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_gamma_bounds() {
        assert!(ValueIterationConfig::default()
            .with_gamma(0.0)
            .validate()
            .is_ok());
        assert!(matches!(
            ValueIterationConfig::default().with_gamma(1.0).validate(),
            Err(Error::InvalidGamma(_))
        ));
        assert!(ValueIterationConfig::default()
            .with_gamma(-0.1)
            .validate()
            .is_err());
        assert!(ValueIterationConfig::default()
            .with_gamma(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_theta() {
        assert!(matches!(
            ValueIterationConfig::default().with_theta(0.0).validate(),
            Err(Error::InvalidTheta(_))
        ));
        assert!(ValueIterationConfig::default()
            .with_theta(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_max_iterations() {
        assert!(matches!(
            ValueIterationConfig::default()
                .with_max_iterations(0)
                .validate(),
            Err(Error::InvalidMaxIterations)
        ));
    }
}
