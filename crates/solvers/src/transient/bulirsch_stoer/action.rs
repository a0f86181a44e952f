/// Control actions supported by the Bulirsch–Stoer drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the integration early and return the solution so far.
    StopEarly,
}
