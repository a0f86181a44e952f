//! Equations of motion.
//!
//! With `δ = θ2 − θ1` and total mass `M = 2m`, the Lagrangian equations for
//! two equal arms of length `l` carrying equal bobs of mass `m` give
//!
//! ```text
//! den = M·l − m·l·cos²δ
//! α1  = ( m·l·ω1²·sinδ·cosδ + m·g·sinθ2·cosδ + m·l·ω2²·sinδ − M·g·sinθ1) / den
//! α2  = (−m·l·ω2²·sinδ·cosδ + M·g·sinθ1·cosδ − M·l·ω1²·sinδ − M·g·sinθ2) / den
//! ```
//!
//! Both accelerations share the denominator because both arms have the same
//! length. Since `cos²δ ≤ 1`, `den ≥ m·l > 0` and the system is never
//! singular.

use crate::{Params, State};

/// Returns `[ω1, α1, ω2, α2]`, the time derivative of `state` in array slot
/// order.
#[must_use]
pub fn derivative(params: &Params, state: &State) -> [f64; 4] {
    let l = params.length();
    let m = params.mass();
    let g = params.gravity();
    let total_mass = 2.0 * m;

    let State {
        theta1,
        omega1,
        theta2,
        omega2,
    } = *state;

    let (sin_d, cos_d) = (theta2 - theta1).sin_cos();
    let omega1_sq = omega1 * omega1;
    let omega2_sq = omega2 * omega2;

    let den = total_mass * l - m * l * cos_d * cos_d;

    let alpha1 = (m * l * omega1_sq * sin_d * cos_d
        + m * g * theta2.sin() * cos_d
        + m * l * omega2_sq * sin_d
        - total_mass * g * theta1.sin())
        / den;

    let alpha2 = (-m * l * omega2_sq * sin_d * cos_d
        + total_mass * g * theta1.sin() * cos_d
        - total_mass * l * omega1_sq * sin_d
        - total_mass * g * theta2.sin())
        / den;

    [omega1, alpha1, omega2, alpha2]
}
