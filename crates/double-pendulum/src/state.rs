/// Instantaneous configuration of the double pendulum.
///
/// Angles are in radians from the downward vertical and are never wrapped.
/// Angular velocities are in radians per second. The array form used by the
/// integrator is `[theta1, omega1, theta2, omega2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct State {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

impl State {
    /// Creates a state with the given angles and both bobs at rest.
    #[must_use]
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self {
            theta1,
            omega1: 0.0,
            theta2,
            omega2: 0.0,
        }
    }
}

impl From<[f64; 4]> for State {
    fn from([theta1, omega1, theta2, omega2]: [f64; 4]) -> Self {
        Self {
            theta1,
            omega1,
            theta2,
            omega2,
        }
    }
}

impl From<State> for [f64; 4] {
    fn from(state: State) -> Self {
        [state.theta1, state.omega1, state.theta2, state.omega2]
    }
}
