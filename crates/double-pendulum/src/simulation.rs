use std::{fs::File, io, path::Path};

use pendulum_solvers::transient::bulirsch_stoer::{self, Action, Config, Event, Stats};

use crate::{
    Error, Params, State, energy,
    trajectory::{TrajectoryRecord, TrajectorySink, TrajectoryWriter},
};

/// A double pendulum and its integrator settings.
///
/// The state is advanced in place by [`advance`](Self::advance) and
/// [`record`](Self::record). Both take `&mut self`, so a simulation shared
/// across threads needs external synchronization.
///
/// # Example
///
/// ```
/// use double_pendulum::Simulation;
///
/// let mut sim = Simulation::new(1.0, 0.05, 0.1745329, 0.1745329)?;
/// let (theta1, theta2) = sim.advance(1.0 / 60.0)?;
///
/// assert!(theta1 < 0.1745329);
/// assert!(theta2 > 0.1745);
/// # Ok::<(), double_pendulum::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    params: Params,
    state: State,
    config: Config,
}

/// Summary of a [`Simulation::record`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recording {
    /// Records handed to the sink, including the one at `t = 0`.
    pub records: usize,

    /// Time of the last record, where the state was left.
    pub end_time: f64,

    /// Work done by the integrator.
    pub stats: Stats,
}

impl Simulation {
    /// Creates a simulation with both bobs at rest at the given angles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `length` or `mass` is not a
    /// positive finite number, or if an angle is not finite.
    pub fn new(length: f64, mass: f64, theta1: f64, theta2: f64) -> Result<Self, Error> {
        let params = Params::new(length, mass)?;
        finite("theta1", theta1)?;
        finite("theta2", theta2)?;

        log::debug!("new simulation: l = {length}, m = {mass}, θ1 = {theta1}, θ2 = {theta2}");
        Ok(Self::from_parts(params, State::at_rest(theta1, theta2)))
    }

    /// Creates a simulation from validated parameters and any state.
    #[must_use]
    pub fn from_parts(params: Params, state: State) -> Self {
        Self {
            params,
            state,
            config: Config::default(),
        }
    }

    /// Integrates forward by `dt` and returns the new `(θ1, θ2)`.
    ///
    /// Each call is an independent integration from a fresh initial step
    /// guess, so repeated small calls cost more than one long call but keep
    /// the same accuracy. `advance(0.0)` leaves the state untouched, and a
    /// negative `dt` integrates backward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integration`] if `dt` is not finite or the integrator
    /// gives up. The state is unchanged on error.
    pub fn advance(&mut self, dt: f64) -> Result<(f64, f64), Error> {
        let mut y: [f64; 4] = self.state.into();
        bulirsch_stoer::integrate_adaptive(&self.params, &mut y, 0.0, dt, &self.config)?;

        self.state = State::from(y);
        Ok((self.state.theta1, self.state.theta2))
    }

    /// Integrates from `t = 0` to `total_time`, handing a record to `sink`
    /// every `dt_report`.
    ///
    /// The first record is the current state at `t = 0`. Later records land
    /// on exact multiples of `dt_report`; a trailing remainder shorter than
    /// `dt_report` is not integrated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integration`] for an invalid interval or when the
    /// integrator gives up, leaving the state unchanged. Returns
    /// [`Error::Sink`] if the sink fails; the state is then left at the
    /// boundary whose record the sink rejected.
    pub fn record<S: TrajectorySink>(
        &mut self,
        dt_report: f64,
        total_time: f64,
        sink: &mut S,
    ) -> Result<Recording, Error> {
        let energy_before = self.total_energy();
        let mut y: [f64; 4] = self.state.into();
        let mut failure = None;

        let solution = bulirsch_stoer::integrate_const(
            &self.params,
            &mut y,
            0.0,
            total_time,
            dt_report,
            &self.config,
            |event: &Event<'_, 4>| {
                let record = TrajectoryRecord {
                    t: event.t,
                    theta1: event.state[0],
                    theta2: event.state[2],
                };
                match sink.write_record(&record) {
                    Ok(()) => None,
                    Err(error) => {
                        failure = Some(error);
                        Some(Action::StopEarly)
                    }
                }
            },
        )?;

        self.state = State::from(y);

        if let Some(error) = failure {
            log::debug!("sink failed at t = {}", solution.t);
            return Err(Error::Sink(Box::new(error)));
        }

        let drift = self.total_energy() - energy_before;
        log::debug!(
            "recorded {} points to t = {}, energy drift {drift:e}",
            solution.events,
            solution.t
        );

        Ok(Recording {
            records: solution.events,
            end_time: solution.t,
            stats: solution.stats,
        })
    }

    /// Runs [`record`](Self::record) into a text file at `path`.
    ///
    /// The file is created or truncated, written through a buffer, and
    /// flushed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created or written, and
    /// [`Error::Integration`] as for [`record`](Self::record).
    pub fn record_to_file(
        &mut self,
        dt_report: f64,
        total_time: f64,
        path: impl AsRef<Path>,
    ) -> Result<Recording, Error> {
        let path = path.as_ref();
        let io_error = |source: io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_error)?;
        let mut writer = TrajectoryWriter::new(file);

        let recording = match self.record(dt_report, total_time, &mut writer) {
            Ok(recording) => recording,
            Err(Error::Sink(source)) => {
                return Err(match source.downcast::<io::Error>() {
                    Ok(source) => io_error(*source),
                    Err(source) => Error::Sink(source),
                });
            }
            Err(error) => return Err(error),
        };

        writer.finish().map_err(io_error)?;
        log::info!("wrote {} records to {}", recording.records, path.display());
        Ok(recording)
    }

    /// Angle of the upper arm, narrowed to single precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn theta1(&self) -> f32 {
        self.state.theta1 as f32
    }

    /// Angular velocity of the upper arm, narrowed to single precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn omega1(&self) -> f32 {
        self.state.omega1 as f32
    }

    /// Angle of the lower arm, narrowed to single precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn theta2(&self) -> f32 {
        self.state.theta2 as f32
    }

    /// Angular velocity of the lower arm, narrowed to single precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn omega2(&self) -> f32 {
        self.state.omega2 as f32
    }

    /// Sets the angle of the upper arm.
    pub fn set_theta1(&mut self, value: f64) {
        self.state.theta1 = value;
    }

    /// Sets the angular velocity of the upper arm.
    pub fn set_omega1(&mut self, value: f64) {
        self.state.omega1 = value;
    }

    /// Sets the angle of the lower arm.
    pub fn set_theta2(&mut self, value: f64) {
        self.state.theta2 = value;
    }

    /// Sets the angular velocity of the lower arm.
    pub fn set_omega2(&mut self, value: f64) {
        self.state.omega2 = value;
    }

    /// The full-precision state.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Arm length and bob mass.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Kinetic energy of both bobs, in joules.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        energy::kinetic(&self.params, &self.state)
    }

    /// Potential energy of both bobs relative to the pivot, in joules.
    #[must_use]
    pub fn potential_energy(&self) -> f64 {
        energy::potential(&self.params, &self.state)
    }

    pub(crate) fn total_energy(&self) -> f64 {
        energy::total(&self.params, &self.state)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
