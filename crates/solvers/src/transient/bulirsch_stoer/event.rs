/// Event emitted by [`integrate_const`](super::integrate_const) at each
/// reporting boundary.
///
/// Index 0 is the initial state at `t0`, before any integration. Index `i` is
/// emitted once the state has been advanced to `t0 + i * dt`, regardless of
/// how many internal sub-steps that took.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a, const N: usize> {
    /// The reporting boundary number (0 for the initial state).
    pub index: usize,

    /// Time at this boundary.
    pub t: f64,

    /// State at this boundary.
    pub state: &'a [f64; N],
}
