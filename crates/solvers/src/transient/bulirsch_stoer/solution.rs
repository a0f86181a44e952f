/// Indicates how a reporting integration terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the final reporting boundary.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Work counters for one integration call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Trial steps that met the error tolerance and advanced the state.
    pub accepted: usize,

    /// Trial steps that were discarded and retried with a smaller step.
    pub rejected: usize,

    /// Calls to the system's derivative.
    pub evaluations: usize,
}

/// The result of [`integrate_const`](super::integrate_const).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// How the integration terminated.
    pub status: Status,

    /// Number of events emitted, including the initial one.
    pub events: usize,

    /// Time of the last emitted boundary, where the state was left.
    pub t: f64,

    /// Work done by the stepper.
    pub stats: Stats,
}
