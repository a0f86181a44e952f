//! Numerical integrators for [`OdeSystem`]s.
//!
//! # Modules
//!
//! - [`transient`]: time-marching solvers that advance a state in place
//!
//! [`OdeSystem`]: pendulum_core::OdeSystem

pub mod transient;
