//! Filter configuration.

use serde::{Deserialize, Serialize};

/// What an update does when the innovation covariance `H·P·Hᵗ + R` cannot be inverted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularPolicy {
    /// Fail the update with [`Error::SingularInnovation`](crate::Error::SingularInnovation)
    /// and leave the state and covariance untouched.
    #[default]
    Strict,
    /// Carry on with a NaN gain, so the state and covariance become NaN.
    ///
    /// Use [`KalmanFilter::is_finite`](crate::KalmanFilter::is_finite) to detect this.
    Propagate,
}

/// Configuration for a [`KalmanFilter`](crate::KalmanFilter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Default time step used by `predict()`.
    pub dt: f64,

    /// Behavior on a singular innovation covariance.
    #[serde(default)]
    pub singular_policy: SingularPolicy,
}

impl FilterConfig {
    /// Create a configuration with the given default time step and the strict policy.
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            singular_policy: SingularPolicy::default(),
        }
    }

    /// Set the singular innovation policy.
    pub fn with_singular_policy(mut self, policy: SingularPolicy) -> Self {
        self.singular_policy = policy;
        self
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}
