//! Internal numeric helpers shared by the filter implementations.

pub mod linalg;
