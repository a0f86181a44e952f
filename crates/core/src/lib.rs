//! Core traits for the pendulum workspace.
//!
//! This crate defines the shared abstractions that solvers and models build on:
//!
//! - [`OdeSystem`]: a first-order ODE `dy/dt = f(t, y)` over a fixed-size state
//! - [`Observer`]: receives solver events and optionally returns control actions

mod observer;
mod system;

pub use observer::Observer;
pub use system::OdeSystem;
