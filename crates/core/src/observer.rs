/// Receives solver events and decides how the integration should proceed.
///
/// Observers let callers monitor or steer a solver without changing its API,
/// enabling logging, output sinks, early stopping, or custom control policies.
///
/// The `observe` method returns `Option<A>`, where `Some(action)` requests a
/// solver-specific action and `None` lets the solver continue unchanged.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

/// Blanket implementation for observer closures.
impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

/// A no-op observer that always returns `None`.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Stop,
    }

    fn drive<Obs: Observer<usize, Action>>(mut observer: Obs, events: usize) -> usize {
        for event in 0..events {
            if observer.observe(&event) == Some(Action::Stop) {
                return event;
            }
        }
        events
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 5), 5);
    }

    #[test]
    fn closure_observer_can_stop() {
        let mut seen = Vec::new();
        let stopped_at = drive(
            |event: &usize| {
                seen.push(*event);
                (*event == 2).then_some(Action::Stop)
            },
            10,
        );

        assert_eq!(stopped_at, 2);
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
