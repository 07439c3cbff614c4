//! Linear Kalman filtering.
//!
//! - `KalmanFilter` - Discrete-time linear filter with separate predict and
//!   update steps, supporting per-call time steps and dynamics matrices

mod kalman;

pub use kalman::KalmanFilter;
