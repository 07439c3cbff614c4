//! Discrete-time linear Kalman filter.
//!
//! The filter owns the system matrices and the running estimate, and advances
//! them through separate predict and update steps so that predictions can run
//! at a fixed tick rate while measurements arrive irregularly.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

use crate::config::{FilterConfig, SingularPolicy};
use crate::internal::linalg;
use crate::{Error, Result};

/// Linear Kalman filter over a state of dimension `n` and measurements of dimension `m`.
///
/// Dimensions are taken from the matrices at construction and never change.
/// A filter must be initialized with [`init`](Self::init) or
/// [`init_with`](Self::init_with) before predicting or updating.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    /// System dynamics matrix (n x n)
    f: DMatrix<f64>,
    /// Output matrix (m x n)
    h: DMatrix<f64>,
    /// Process noise covariance (n x n)
    q: DMatrix<f64>,
    /// Measurement noise covariance (m x m)
    r: DMatrix<f64>,
    /// Estimate error covariance (n x n)
    p: DMatrix<f64>,
    /// Covariance restored on every init (n x n)
    p0: DMatrix<f64>,
    /// Gain from the last update (n x m)
    k: DMatrix<f64>,
    /// Cached n x n identity
    i: DMatrix<f64>,
    /// Estimated state
    x: DVector<f64>,
    /// (n, m), or None for a blank filter
    dims: Option<(usize, usize)>,
    t0: f64,
    t: f64,
    initialized: bool,
    config: FilterConfig,
}

impl KalmanFilter {
    /// Create a filter with the specified matrices.
    ///
    /// # Arguments
    /// * `dt` - Default time step for [`predict`](Self::predict)
    /// * `f` - System dynamics matrix (n x n)
    /// * `h` - Output matrix (m x n)
    /// * `q` - Process noise covariance (n x n)
    /// * `r` - Measurement noise covariance (m x m)
    /// * `p` - Estimate error covariance (n x n)
    pub fn new(
        dt: f64,
        f: DMatrix<f64>,
        h: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        p: DMatrix<f64>,
    ) -> Self {
        Self::with_config(FilterConfig::new(dt), f, h, q, r, p)
    }

    /// Create a filter from a configuration and the system matrices.
    pub fn with_config(
        config: FilterConfig,
        f: DMatrix<f64>,
        h: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        p: DMatrix<f64>,
    ) -> Self {
        let n = f.nrows();
        let m = h.nrows();

        Self {
            f,
            h,
            q,
            r,
            p0: p.clone(),
            p,
            k: DMatrix::zeros(n, m),
            i: DMatrix::identity(n, n),
            x: DVector::zeros(n),
            dims: Some((n, m)),
            t0: 0.0,
            t: 0.0,
            initialized: false,
            config,
        }
    }

    /// Initialize the filter with a zero state at time zero.
    pub fn init(&mut self) -> Result<()> {
        let (n, _) = self.dims.ok_or(Error::NotConfigured)?;
        self.reset(0.0, DVector::zeros(n));
        Ok(())
    }

    /// Initialize the filter with a guess for the state at time `t0`.
    pub fn init_with(&mut self, t0: f64, x0: DVector<f64>) -> Result<()> {
        let (n, _) = self.dims.ok_or(Error::NotConfigured)?;
        if x0.len() != n {
            return Err(Error::DimensionMismatch {
                what: "initial state",
                expected: n,
                got: x0.len(),
            });
        }
        self.reset(t0, x0);
        Ok(())
    }

    fn reset(&mut self, t0: f64, x0: DVector<f64>) {
        self.t0 = t0;
        self.t = t0;
        self.x = x0;
        self.p.copy_from(&self.p0);
        self.initialized = true;
        debug!(t0, dim_x = self.x.len(), "Kalman filter initialized");
    }

    /// Predict the next state using the default time step.
    pub fn predict(&mut self) -> Result<()> {
        self.predict_with_dt(self.config.dt)
    }

    /// Predict the next state using the given time step.
    ///
    /// Only the state, covariance and time change.
    pub fn predict_with_dt(&mut self, dt: f64) -> Result<()> {
        self.ensure_initialized()?;

        // x = F @ x
        self.x = &self.f * &self.x;

        // P = F @ P @ F.T + Q
        self.p = &self.f * &self.p * self.f.transpose() + &self.q;

        self.t += dt;
        trace!(t = self.t, dt, "predict");
        Ok(())
    }

    /// Correct the estimate with a measurement `z` (length m).
    ///
    /// Dynamics, noise matrices and time are left unchanged.
    pub fn update(&mut self, z: &DVector<f64>) -> Result<()> {
        self.ensure_initialized()?;
        self.correct(z)
    }

    /// Correct the estimate with a measurement `y` taken `dt` after the
    /// current time, replacing the dynamics matrix with `f`.
    ///
    /// The new `f` is used by subsequent predictions; the gain does not
    /// depend on it. `f` and the time are replaced before the correction,
    /// so they are already applied if the correction fails.
    pub fn update_with_dynamics(
        &mut self,
        y: &DVector<f64>,
        dt: f64,
        f: DMatrix<f64>,
    ) -> Result<()> {
        self.ensure_initialized()?;
        self.f = f;
        self.t += dt;
        self.correct(y)
    }

    fn correct(&mut self, z: &DVector<f64>) -> Result<()> {
        // S = H @ P @ H.T + R
        let s = linalg::innovation_covariance(&self.h, &self.p, &self.r);
        let dim_z = s.nrows();

        // K = P @ H.T @ S^-1
        self.k = match linalg::kalman_gain(&self.p, &self.h, s) {
            Some(k) => k,
            None => match self.config.singular_policy {
                SingularPolicy::Strict => {
                    warn!(t = self.t, dim_z, "Innovation covariance is singular, update rejected");
                    return Err(Error::SingularInnovation { dim: dim_z });
                }
                SingularPolicy::Propagate => {
                    warn!(t = self.t, dim_z, "Innovation covariance is singular, propagating NaN gain");
                    DMatrix::from_element(self.x.len(), dim_z, f64::NAN)
                }
            },
        };

        // x = x + K @ (z - H @ x)
        let y = linalg::innovation(z, &self.h, &self.x);
        self.x += &self.k * y;

        // P = (I - K @ H) @ P
        self.p = (&self.i - &self.k * &self.h) * &self.p;

        trace!(t = self.t, "update");
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Current state estimate.
    #[inline]
    pub fn state(&self) -> &DVector<f64> {
        &self.x
    }

    /// Current filter time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Time the filter was last initialized at.
    #[inline]
    pub fn initial_time(&self) -> f64 {
        self.t0
    }

    /// Default time step used by [`predict`](Self::predict).
    #[inline]
    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    /// Current estimate error covariance.
    #[inline]
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.p
    }

    /// Covariance restored on initialization.
    #[inline]
    pub fn initial_covariance(&self) -> &DMatrix<f64> {
        &self.p0
    }

    /// Gain computed by the last update (zeros before the first update).
    #[inline]
    pub fn gain(&self) -> &DMatrix<f64> {
        &self.k
    }

    /// Current system dynamics matrix.
    #[inline]
    pub fn dynamics(&self) -> &DMatrix<f64> {
        &self.f
    }

    /// Output matrix.
    #[inline]
    pub fn observation(&self) -> &DMatrix<f64> {
        &self.h
    }

    /// Process noise covariance.
    #[inline]
    pub fn process_noise(&self) -> &DMatrix<f64> {
        &self.q
    }

    /// Measurement noise covariance.
    #[inline]
    pub fn measurement_noise(&self) -> &DMatrix<f64> {
        &self.r
    }

    /// State dimension, or `None` for a blank filter.
    #[inline]
    pub fn dim_x(&self) -> Option<usize> {
        self.dims.map(|(n, _)| n)
    }

    /// Measurement dimension, or `None` for a blank filter.
    #[inline]
    pub fn dim_z(&self) -> Option<usize> {
        self.dims.map(|(_, m)| m)
    }

    /// Whether the filter was built from system matrices.
    #[inline]
    pub fn is_configured(&self) -> bool {
        self.dims.is_some()
    }

    /// Whether `init` or `init_with` has been called.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the state and covariance are free of NaN and infinities.
    pub fn is_finite(&self) -> bool {
        self.x.iter().all(|v| v.is_finite()) && self.p.iter().all(|v| v.is_finite())
    }

    /// Largest absolute difference between the covariance and its transpose.
    pub fn covariance_asymmetry(&self) -> f64 {
        linalg::asymmetry(&self.p)
    }

    /// Configuration the filter was built with.
    #[inline]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl Default for KalmanFilter {
    /// A blank filter with empty matrices. It cannot be initialized.
    fn default() -> Self {
        Self {
            f: DMatrix::zeros(0, 0),
            h: DMatrix::zeros(0, 0),
            q: DMatrix::zeros(0, 0),
            r: DMatrix::zeros(0, 0),
            p: DMatrix::zeros(0, 0),
            p0: DMatrix::zeros(0, 0),
            k: DMatrix::zeros(0, 0),
            i: DMatrix::zeros(0, 0),
            x: DVector::zeros(0),
            dims: None,
            t0: 0.0,
            t: 0.0,
            initialized: false,
            config: FilterConfig::default(),
        }
    }
}
