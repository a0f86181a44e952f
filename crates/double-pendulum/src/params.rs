use pendulum_core::OdeSystem;

use crate::{Error, State, eom};

/// Standard gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.80665;

/// Physical constants of an equal-arm, equal-mass double pendulum.
///
/// Both segments share the same arm length and bob mass. Gravity is fixed at
/// [`GRAVITY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    length: f64,
    mass: f64,
}

impl Params {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `length` or `mass` is not a
    /// positive finite number.
    pub fn new(length: f64, mass: f64) -> Result<Self, Error> {
        positive("length", length)?;
        positive("mass", mass)?;
        Ok(Self { length, mass })
    }

    /// Arm length of each segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Mass of each bob.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Gravitational acceleration.
    #[must_use]
    pub fn gravity(&self) -> f64 {
        GRAVITY
    }
}

impl OdeSystem<4> for Params {
    fn derivative(&self, _t: f64, state: &[f64; 4]) -> [f64; 4] {
        eom::derivative(self, &State::from(*state))
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}
