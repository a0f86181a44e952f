/// A first-order ODE system `dy/dt = f(t, y)` with `N` state variables.
///
/// Higher-order equations are expressed by widening the state, e.g. a pair of
/// coupled second-order equations becomes `N = 4` with angles and angular
/// velocities interleaved.
///
/// Implementations must be pure: solvers call `derivative` many times per step
/// at trial states that are never committed, so it must not mutate anything
/// observable.
///
/// Closures of the form `Fn(f64, &[f64; N]) -> [f64; N]` implement this trait.
pub trait OdeSystem<const N: usize> {
    /// Evaluates the time derivative of `state` at time `t`.
    fn derivative(&self, t: f64, state: &[f64; N]) -> [f64; N];
}

/// Blanket implementation for derivative closures.
impl<F, const N: usize> OdeSystem<N> for F
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
{
    fn derivative(&self, t: f64, state: &[f64; N]) -> [f64; N] {
        self(t, state)
    }
}
