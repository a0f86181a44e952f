//! Kinetic and potential energy of the pendulum.
//!
//! Heights are measured from the pivot, so the potential energy is negative
//! whenever the bobs hang below it.

use crate::{Params, State};

/// Kinetic energy of both bobs.
///
/// The second bob's velocity is the vector sum of both arms' tangential
/// velocities, which brings in the cross term in `cos(θ2 − θ1)`.
#[must_use]
pub fn kinetic(params: &Params, state: &State) -> f64 {
    let m = params.mass();
    let l = params.length();
    let State {
        theta1,
        omega1,
        theta2,
        omega2,
    } = *state;

    let upper = 0.5 * m * l * l * omega1 * omega1;
    let lower = 0.5
        * m
        * l
        * l
        * (omega1 * omega1 + omega2 * omega2 + 2.0 * omega1 * omega2 * (theta2 - theta1).cos());
    upper + lower
}

/// Gravitational potential energy of both bobs relative to the pivot.
#[must_use]
pub fn potential(params: &Params, state: &State) -> f64 {
    -params.mass()
        * params.gravity()
        * params.length()
        * (2.0 * state.theta1.cos() + state.theta2.cos())
}

/// Total mechanical energy.
pub(crate) fn total(params: &Params, state: &State) -> f64 {
    kinetic(params, state) + potential(params, state)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::GRAVITY;

    fn params() -> Params {
        Params::new(2.0, 0.5).expect("valid params")
    }

    #[test]
    fn resting_pendulum_has_only_potential_energy() {
        let state = State::default();

        assert_eq!(kinetic(&params(), &state), 0.0);
        // Upper bob at -l, lower bob at -2l.
        assert_relative_eq!(
            potential(&params(), &state),
            -0.5 * GRAVITY * 2.0 * 3.0,
            max_relative = 1e-14
        );
    }

    #[test]
    fn horizontal_arms_have_zero_potential() {
        let half_pi = std::f64::consts::FRAC_PI_2;
        let state = State::at_rest(half_pi, half_pi);

        assert_relative_eq!(potential(&params(), &state), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn rigid_rotation_kinetic_energy() {
        // Arms aligned and spinning together: bobs at radius l and 2l.
        let omega = 1.5;
        let state = State {
            theta1: 0.4,
            omega1: omega,
            theta2: 0.4,
            omega2: omega,
        };

        let (m, l) = (0.5, 2.0);
        let expected = 0.5 * m * (l * omega).powi(2) + 0.5 * m * (2.0 * l * omega).powi(2);
        assert_relative_eq!(kinetic(&params(), &state), expected, max_relative = 1e-14);
    }

    #[test]
    fn opposed_arms_cancel_lower_bob_velocity() {
        // Aligned arms turning in opposite directions leave the lower bob still.
        let state = State {
            theta1: 0.0,
            omega1: 1.0,
            theta2: 0.0,
            omega2: -1.0,
        };

        let (m, l) = (0.5, 2.0);
        assert_relative_eq!(kinetic(&params(), &state), 0.5 * m * l * l, max_relative = 1e-14);
    }

    #[test]
    fn total_is_the_sum() {
        let state = State {
            theta1: 0.3,
            omega1: -0.2,
            theta2: 1.2,
            omega2: 0.8,
        };

        assert_relative_eq!(
            total(&params(), &state),
            kinetic(&params(), &state) + potential(&params(), &state)
        );
    }
}
