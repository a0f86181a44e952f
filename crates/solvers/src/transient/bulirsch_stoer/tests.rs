use super::*;

use std::cell::Cell;

use approx::{assert_abs_diff_eq, assert_relative_eq};

// --- Test fixtures ---

/// Exponential decay: x' = -x.
fn decay(_t: f64, x: &[f64; 1]) -> [f64; 1] {
    [-x[0]]
}

/// Unit harmonic oscillator: x'' = -x.
fn oscillator(_t: f64, x: &[f64; 2]) -> [f64; 2] {
    [x[1], -x[0]]
}

/// A system that does nothing.
fn still(_t: f64, _x: &[f64; 1]) -> [f64; 1] {
    [0.0]
}

// --- integrate_adaptive ---

#[test]
fn exponential_decay_matches_closed_form() {
    let mut state = [1.0];

    let stats = integrate_adaptive(&decay, &mut state, 0.0, 1.0, &Config::default())
        .expect("should integrate");

    assert_abs_diff_eq!(state[0], (-1.0_f64).exp(), epsilon = 1e-12);
    assert!(stats.accepted > 0);
}

#[test]
fn oscillator_stays_on_the_circle() {
    let mut state = [1.0, 0.0];

    integrate_adaptive(&oscillator, &mut state, 0.0, 10.0, &Config::default())
        .expect("should integrate");

    assert_abs_diff_eq!(state[0], 10.0_f64.cos(), epsilon = 1e-10);
    assert_abs_diff_eq!(state[1], -10.0_f64.sin(), epsilon = 1e-10);
}

#[test]
fn stats_count_every_evaluation() {
    let calls = Cell::new(0);
    let counted = |t: f64, x: &[f64; 1]| {
        calls.set(calls.get() + 1);
        decay(t, x)
    };
    let mut state = [1.0];

    let stats = integrate_adaptive(&counted, &mut state, 0.0, 2.0, &Config::default())
        .expect("should integrate");

    assert_eq!(stats.evaluations, calls.get());
}

#[test]
fn empty_interval_leaves_state_alone() {
    let calls = Cell::new(0);
    let counted = |t: f64, x: &[f64; 1]| {
        calls.set(calls.get() + 1);
        decay(t, x)
    };
    let mut state = [0.25];

    let stats = integrate_adaptive(&counted, &mut state, 0.5, 0.5, &Config::default())
        .expect("should integrate");

    assert_eq!(stats, Stats::default());
    assert_eq!(calls.get(), 0);
    assert_eq!(state, [0.25]);
}

#[test]
fn integrates_backward_in_time() {
    let mut state = [(-1.0_f64).exp()];

    integrate_adaptive(&decay, &mut state, 1.0, 0.0, &Config::default())
        .expect("should integrate");

    assert_abs_diff_eq!(state[0], 1.0, epsilon = 1e-12);
}

#[test]
fn loose_tolerance_still_converges() {
    let config = Config::new(1e-6, 1e-6, 0.5, 100).expect("valid config");
    let mut state = [1.0, 0.0];

    let stats =
        integrate_adaptive(&oscillator, &mut state, 0.0, 3.0, &config).expect("should integrate");

    assert_abs_diff_eq!(state[0], 3.0_f64.cos(), epsilon = 1e-4);
    assert_abs_diff_eq!(state[1], -3.0_f64.sin(), epsilon = 1e-4);
    assert!(stats.accepted < 50);
}

#[test]
fn non_finite_bounds_are_rejected() {
    let mut state = [1.0];

    let error = integrate_adaptive(&decay, &mut state, 0.0, f64::INFINITY, &Config::default())
        .expect_err("should reject");
    assert_eq!(
        error,
        Error::NonFiniteTime {
            value: f64::INFINITY
        }
    );

    let error = integrate_adaptive(&decay, &mut state, f64::NAN, 1.0, &Config::default())
        .expect_err("should reject");
    assert!(matches!(error, Error::NonFiniteTime { value } if value.is_nan()));
    assert_eq!(state, [1.0]);
}

#[test]
fn gives_up_after_too_many_rejections() {
    // A huge first step over a fast, large forcing cannot meet the tolerance.
    let config = Config::new(1e-14, 1e-14, 10.0, 1).expect("valid config");
    let forcing = |t: f64, _x: &[f64; 1]| [(50.0 * t).sin() * 1.0e3];
    let mut state = [0.0];

    let error =
        integrate_adaptive(&forcing, &mut state, 0.0, 10.0, &config).expect_err("should give up");

    assert!(matches!(
        error,
        Error::TooManyRejections { rejections: 1, .. }
    ));
}

// --- integrate_const ---

#[test]
fn reports_at_every_boundary() {
    let mut times = Vec::new();
    let mut values = Vec::new();
    let mut state = [1.0];

    let solution = integrate_const(
        &decay,
        &mut state,
        0.0,
        1.0,
        0.1,
        &Config::default(),
        |event: &Event<'_, 1>| {
            assert_eq!(event.index, times.len());
            times.push(event.t);
            values.push(event.state[0]);
            None
        },
    )
    .expect("should integrate");

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.events, 11);
    assert_eq!(times.len(), 11);
    assert_relative_eq!(times[0], 0.0);
    assert_relative_eq!(values[0], 1.0);

    for (t, x) in times.iter().zip(&values) {
        assert_abs_diff_eq!(*x, (-t).exp(), epsilon = 1e-12);
    }

    assert_relative_eq!(solution.t, 1.0);
    assert_abs_diff_eq!(state[0], (-1.0_f64).exp(), epsilon = 1e-12);
}

#[test]
fn near_whole_span_counts_every_interval() {
    let mut state = [3.0];

    let solution =
        integrate_const_unobserved(&still, &mut state, 0.0, 30.0, 0.001, &Config::default())
            .expect("should integrate");

    assert_eq!(solution.events, 30_001);
    assert_relative_eq!(solution.t, 30.0, max_relative = 1e-12);
    assert_eq!(state, [3.0]);
}

#[test]
fn partial_interval_is_not_integrated() {
    let mut state = [1.0];

    let solution =
        integrate_const_unobserved(&decay, &mut state, 0.0, 1.05, 0.1, &Config::default())
            .expect("should integrate");

    assert_eq!(solution.events, 11);
    assert_relative_eq!(solution.t, 1.0);
    assert_abs_diff_eq!(state[0], (-1.0_f64).exp(), epsilon = 1e-12);
}

#[test]
fn zero_span_reports_initial_state_only() {
    let mut state = [2.0];

    let solution =
        integrate_const_unobserved(&decay, &mut state, 4.0, 4.0, 0.1, &Config::default())
            .expect("should integrate");

    assert_eq!(solution.events, 1);
    assert_eq!(solution.stats, Stats::default());
    assert_relative_eq!(solution.t, 4.0);
    assert_eq!(state, [2.0]);
}

#[test]
fn observer_can_stop_early() {
    let mut state = [1.0];

    let solution = integrate_const(
        &decay,
        &mut state,
        0.0,
        1.0,
        0.1,
        &Config::default(),
        |event: &Event<'_, 1>| (event.index == 3).then_some(Action::StopEarly),
    )
    .expect("should stop early");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.events, 4);
    assert_relative_eq!(solution.t, 0.3, max_relative = 1e-12);
    assert_abs_diff_eq!(state[0], (-0.3_f64).exp(), epsilon = 1e-12);
}

#[test]
fn invalid_report_interval_is_rejected() {
    let mut state = [1.0];
    let config = Config::default();

    for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
        let error = integrate_const_unobserved(&decay, &mut state, 0.0, 1.0, dt, &config)
            .expect_err("should reject");
        assert!(matches!(error, Error::InvalidReportInterval { .. }));
    }

    let error = integrate_const_unobserved(&decay, &mut state, 1.0, 0.0, 0.1, &config)
        .expect_err("should reject");
    assert_eq!(error, Error::InvalidReportInterval { dt: 0.1, span: -1.0 });
    assert_eq!(state, [1.0]);
}

#[test]
fn interval_count_snaps_to_whole_multiples() {
    assert_eq!(interval_count(30.0, 0.001), 30_000);
    assert_eq!(interval_count(1.0, 0.1), 10);
    assert_eq!(interval_count(1.05, 0.1), 10);
    assert_eq!(interval_count(0.05, 0.1), 0);
    assert_eq!(interval_count(0.0, 0.1), 0);
}
