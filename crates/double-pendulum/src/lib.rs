//! Double pendulum with equal arm lengths and equal bob masses.
//!
//! The pendulum state `(θ1, ω1, θ2, ω2)` is integrated with an adaptive
//! Bulirsch–Stoer stepper at `1e-14` absolute and relative tolerance. A
//! [`Simulation`] can be driven two ways:
//!
//! - [`Simulation::advance`] integrates over one interval and returns the new
//!   angles, for real-time stepping such as an animation loop.
//! - [`Simulation::record`] integrates over a whole run and hands a
//!   [`TrajectoryRecord`] to a [`TrajectorySink`] at every reporting boundary.
//!   [`Simulation::record_to_file`] writes those records as text.
//!
//! [`SimulationTable`] owns many simulations and exposes the same operations
//! through opaque [`Handle`]s.
//!
//! # Example
//!
//! ```
//! use double_pendulum::{Simulation, TrajectoryRecord};
//!
//! let mut sim = Simulation::new(1.0, 0.05, 0.5, 0.5)?;
//!
//! let mut records: Vec<TrajectoryRecord> = Vec::new();
//! let recording = sim.record(0.1, 2.0, &mut records)?;
//!
//! assert_eq!(recording.records, 21);
//! assert_eq!(records[0].to_string(), "0.000,        0.500000, 0.500000000000000");
//! # Ok::<(), double_pendulum::Error>(())
//! ```

pub mod energy;
pub mod eom;

mod error;
mod params;
mod simulation;
mod state;
mod table;
mod trajectory;

pub use error::Error;
pub use params::{GRAVITY, Params};
pub use simulation::{Recording, Simulation};
pub use state::State;
pub use table::{Handle, SimulationTable};
pub use trajectory::{TrajectoryRecord, TrajectorySink, TrajectoryWriter};
