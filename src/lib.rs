//! # kalman-rs - Linear Kalman Filter
//!
//! A discrete-time linear Kalman filter that fuses a linear process model with
//! noisy linear measurements, producing a minimum-variance estimate of a hidden
//! state together with its covariance.
//!
//! ## Features
//!
//! - Separate predict and update steps, so predictions can run at a fixed tick
//!   rate independent of when measurements arrive
//! - Per-call time steps and dynamics matrices for irregular sampling
//! - Explicit policy for singular innovation covariances (fail fast or
//!   propagate NaN)
//!
//! ## Example
//!
//! ```rust
//! use kalman_rs::KalmanFilter;
//! use nalgebra::{DMatrix, DVector};
//!
//! // 1-D position tracker
//! let mut kf = KalmanFilter::new(
//!     0.1,
//!     DMatrix::from_element(1, 1, 1.0),  // F
//!     DMatrix::from_element(1, 1, 1.0),  // H
//!     DMatrix::from_element(1, 1, 1e-5), // Q
//!     DMatrix::from_element(1, 1, 1e-2), // R
//!     DMatrix::from_element(1, 1, 1.0),  // P
//! );
//! kf.init_with(0.0, DVector::from_element(1, 0.0)).unwrap();
//!
//! for z in [1.0, 2.0, 3.0] {
//!     kf.predict().unwrap();
//!     kf.update(&DVector::from_element(1, z)).unwrap();
//! }
//! assert!(kf.state()[0] > 1.9);
//! ```

// Internal numeric helpers
pub(crate) mod internal;

// Public modules
pub mod config;
pub mod filter;

// Re-exports for convenience
pub use config::{FilterConfig, SingularPolicy};
pub use filter::KalmanFilter;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while running a filter
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("Filter has no system matrices")]
        NotConfigured,

        #[error("Filter used before initialization")]
        NotInitialized,

        #[error("Innovation covariance ({dim}x{dim}) is singular")]
        SingularInnovation { dim: usize },

        #[error("Invalid {what} dimension: expected {expected}, got {got}")]
        DimensionMismatch {
            what: &'static str,
            expected: usize,
            got: usize,
        },
    }

    /// Result type for filter operations
    pub type Result<T> = std::result::Result<T, Error>;
}
