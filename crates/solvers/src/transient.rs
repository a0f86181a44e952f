//! Solvers that advance a state through time.
//!
//! # Solvers
//!
//! - [`bulirsch_stoer`]: adaptive Richardson extrapolation over modified
//!   midpoint sub-steps, suited to smooth problems with tight tolerances

pub mod bulirsch_stoer;
