//! Bulirsch–Stoer extrapolation integrator for ODE systems.
//!
//! # Algorithm
//!
//! Each trial step of size `h` is computed several times with the modified
//! midpoint method, using `2, 4, 6, …, 18` sub-steps. The results are
//! polynomially extrapolated toward zero sub-step size, and the difference
//! between the two highest extrapolations serves as the local error estimate.
//! The error is scaled component-wise by
//!
//! ```text
//! abs_tol + rel_tol * (|x_i| + |h| * |dxdt_i|)
//! ```
//!
//! and a step is accepted when the max-norm of the scaled error is below one.
//! The step size and the extrapolation order are adapted after every trial.
//!
//! # Drivers
//!
//! - [`integrate_adaptive`] advances a state from `t0` to `t1` and reports
//!   nothing but the final state.
//! - [`integrate_const`] advances a state from `t0` to `t1` and emits an
//!   [`Event`] at every multiple of a fixed reporting interval, independent of
//!   the internal step boundaries.
//!
//! Both drivers build a fresh stepper, so no step size or order history leaks
//! from one call into the next.
//!
//! # Example
//!
//! ```
//! use pendulum_solvers::transient::bulirsch_stoer::{self, Config};
//!
//! let decay = |_t: f64, x: &[f64; 1]| [-x[0]];
//! let mut state = [1.0];
//!
//! bulirsch_stoer::integrate_adaptive(&decay, &mut state, 0.0, 1.0, &Config::default())?;
//!
//! assert!((state[0] - (-1.0_f64).exp()).abs() < 1e-12);
//! # Ok::<(), bulirsch_stoer::Error>(())
//! ```

mod action;
mod config;
mod error;
mod event;
mod solution;
mod stepper;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Stats, Status};

use pendulum_core::{Observer, OdeSystem};

use stepper::{StepResult, Stepper};

/// Relative slack when deciding whether a span is a whole number of reporting
/// intervals.
const INTERVAL_SNAP: f64 = 1.0e-9;

/// Advances `state` from `t0` to `t1` with adaptive step size control.
///
/// The first trial step has magnitude [`Config::initial_step`] and points
/// toward `t1`, so backward integration works the same way as forward. The
/// last step is clipped to land exactly on `t1`. When `t0 == t1` the state is
/// left untouched and the system is never evaluated.
///
/// On error `state` holds whatever was reached before the failure.
///
/// # Errors
///
/// Returns [`Error::NonFiniteTime`] if either bound is not finite, or
/// [`Error::TooManyRejections`] if the step size cannot be reduced enough to
/// meet the tolerances.
pub fn integrate_adaptive<S, const N: usize>(
    system: &S,
    state: &mut [f64; N],
    t0: f64,
    t1: f64,
    config: &Config,
) -> Result<Stats, Error>
where
    S: OdeSystem<N>,
{
    check_time(t0)?;
    check_time(t1)?;

    let mut stepper = Stepper::new(config);
    let dt = config.initial_step().copysign(t1 - t0);
    advance(&mut stepper, system, state, t0, t1, dt, config)?;

    let stats = stepper.stats();
    log::debug!("integrated {t0} -> {t1}: {stats:?}");
    Ok(stats)
}

/// Advances `state` from `t0` to `t1`, emitting an [`Event`] at each multiple
/// of the reporting interval `dt`.
///
/// # Reporting boundaries
///
/// Events are emitted at `t0 + i * dt` for `i = 0..=n`, where `n` is the
/// number of whole intervals that fit in `t1 - t0`. A span within a relative
/// `1e-9` of a whole multiple counts as that multiple, so `30.0 / 0.001` gives
/// exactly 30 001 events. Any remainder shorter than `dt` is not integrated:
/// the state is left at the last boundary.
///
/// Between boundaries the stepper adapts freely; each interval starts from a
/// trial step of `min(initial_step, dt)`. The extrapolation order carries
/// over from one interval to the next within the call.
///
/// # Observer
///
/// The observer receives every [`Event`] and may return
/// [`Action::StopEarly`], which ends the integration at that boundary.
///
/// # Errors
///
/// Returns [`Error::NonFiniteTime`] if either bound is not finite,
/// [`Error::InvalidReportInterval`] if `dt` is not a positive finite number or
/// `t1 < t0`, and [`Error::TooManyRejections`] if a step cannot be made to
/// meet the tolerances.
pub fn integrate_const<S, Obs, const N: usize>(
    system: &S,
    state: &mut [f64; N],
    t0: f64,
    t1: f64,
    dt: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    S: OdeSystem<N>,
    Obs: for<'a> Observer<Event<'a, N>, Action>,
{
    check_time(t0)?;
    check_time(t1)?;

    let span = t1 - t0;
    if !dt.is_finite() || dt <= 0.0 || span < 0.0 {
        return Err(Error::InvalidReportInterval { dt, span });
    }

    let intervals = interval_count(span, dt);
    let trial_step = config.initial_step().min(dt);
    let mut stepper = Stepper::new(config);

    let mut status = Status::Complete;
    let mut events = 0;
    let mut t = t0;

    for index in 0..=intervals {
        t = boundary(t0, dt, index);
        events += 1;

        let event = Event {
            index,
            t,
            state: &*state,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            status = Status::StoppedByObserver;
            break;
        }

        if index < intervals {
            let next = boundary(t0, dt, index + 1);
            advance(&mut stepper, system, state, t, next, trial_step, config)?;
        }
    }

    let stats = stepper.stats();
    log::debug!("integrated {t0} -> {t} with {events} reports: {stats:?}");

    Ok(Solution {
        status,
        events,
        t,
        stats,
    })
}

/// Runs [`integrate_const`] without observation.
///
/// # Errors
///
/// Same as [`integrate_const`].
pub fn integrate_const_unobserved<S, const N: usize>(
    system: &S,
    state: &mut [f64; N],
    t0: f64,
    t1: f64,
    dt: f64,
    config: &Config,
) -> Result<Solution, Error>
where
    S: OdeSystem<N>,
{
    integrate_const(system, state, t0, t1, dt, config, ())
}

/// Steps from `t0` to `t1`, retrying rejected trial steps.
#[allow(clippy::float_cmp)]
fn advance<S, const N: usize>(
    stepper: &mut Stepper<N>,
    system: &S,
    state: &mut [f64; N],
    t0: f64,
    t1: f64,
    mut dt: f64,
    config: &Config,
) -> Result<(), Error>
where
    S: OdeSystem<N>,
{
    let mut t = t0;

    while before(t, t1, dt) {
        if before(t1, t + dt, dt) {
            dt = t1 - t;
        }

        let mut rejections = 0;
        loop {
            let start = t;
            let h = dt;
            match stepper.try_step(system, state, &mut t, &mut dt) {
                StepResult::Accepted => {
                    if h == t1 - start {
                        t = t1;
                    }
                    break;
                }
                StepResult::Rejected => {
                    rejections += 1;
                    if rejections >= config.max_rejected_steps() {
                        return Err(Error::TooManyRejections { t, dt, rejections });
                    }
                }
            }
        }
    }

    Ok(())
}

/// Whether `a` lies strictly before `b` in the direction of `dt`.
fn before(a: f64, b: f64, dt: f64) -> bool {
    if dt > 0.0 {
        b - a > f64::EPSILON
    } else {
        a - b > f64::EPSILON
    }
}

fn boundary(t0: f64, dt: f64, index: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let index = index as f64;
    t0 + index * dt
}

/// Number of whole reporting intervals in `span`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn interval_count(span: f64, dt: f64) -> usize {
    let ratio = span / dt;
    let nearest = ratio.round();
    let count = if (ratio - nearest).abs() <= INTERVAL_SNAP * nearest.max(1.0) {
        nearest
    } else {
        ratio.floor()
    };

    count as usize
}

fn check_time(value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteTime { value })
    }
}
