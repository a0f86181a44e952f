use std::{fmt, path::Path};

use crate::{Error, Recording, Simulation, TrajectorySink};

/// Opaque reference to a simulation stored in a [`SimulationTable`].
///
/// A handle stays valid until its simulation is destroyed. Slots are reused,
/// but each reuse bumps the slot's generation, so an old handle never reaches
/// a newer simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    simulation: Option<Simulation>,
}

/// Owns any number of simulations and addresses them by [`Handle`].
///
/// Every operation of [`Simulation`] is available here by handle, with
/// getters widened back to `f64` after single-precision narrowing so the
/// whole surface speaks one float type.
#[derive(Debug, Default)]
pub struct SimulationTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl SimulationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live simulations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a simulation at rest and returns its handle.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::new`].
    pub fn create(
        &mut self,
        length: f64,
        mass: f64,
        theta1: f64,
        theta2: f64,
    ) -> Result<Handle, Error> {
        let simulation = Simulation::new(length, mass, theta1, theta2)?;
        Ok(self.insert(simulation))
    }

    /// Stores an existing simulation.
    pub fn insert(&mut self, simulation: Simulation) -> Handle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.simulation = Some(simulation);
            return Handle {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            simulation: Some(simulation),
        });
        Handle {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Removes a simulation and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if the handle is stale or foreign.
    pub fn destroy(&mut self, handle: Handle) -> Result<Simulation, Error> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Error::UnknownHandle(handle))?;
        let simulation = slot.simulation.take().ok_or(Error::UnknownHandle(handle))?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Ok(simulation)
    }

    /// Borrows a simulation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if the handle is stale or foreign.
    pub fn get(&self, handle: Handle) -> Result<&Simulation, Error> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.simulation.as_ref())
            .ok_or(Error::UnknownHandle(handle))
    }

    /// Mutably borrows a simulation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if the handle is stale or foreign.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut Simulation, Error> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.simulation.as_mut())
            .ok_or(Error::UnknownHandle(handle))
    }

    /// See [`Simulation::advance`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle, otherwise as
    /// [`Simulation::advance`].
    pub fn advance(&mut self, handle: Handle, dt: f64) -> Result<(f64, f64), Error> {
        self.get_mut(handle)?.advance(dt)
    }

    /// See [`Simulation::record`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle, otherwise as
    /// [`Simulation::record`].
    pub fn record<S: TrajectorySink>(
        &mut self,
        handle: Handle,
        dt_report: f64,
        total_time: f64,
        sink: &mut S,
    ) -> Result<Recording, Error> {
        self.get_mut(handle)?.record(dt_report, total_time, sink)
    }

    /// See [`Simulation::record_to_file`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle, otherwise as
    /// [`Simulation::record_to_file`].
    pub fn record_to_file(
        &mut self,
        handle: Handle,
        dt_report: f64,
        total_time: f64,
        path: impl AsRef<Path>,
    ) -> Result<Recording, Error> {
        self.get_mut(handle)?
            .record_to_file(dt_report, total_time, path)
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn get_theta1(&self, handle: Handle) -> Result<f64, Error> {
        Ok(f64::from(self.get(handle)?.theta1()))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn get_theta2(&self, handle: Handle) -> Result<f64, Error> {
        Ok(f64::from(self.get(handle)?.theta2()))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn get_v1(&self, handle: Handle) -> Result<f64, Error> {
        Ok(f64::from(self.get(handle)?.omega1()))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn get_v2(&self, handle: Handle) -> Result<f64, Error> {
        Ok(f64::from(self.get(handle)?.omega2()))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn set_theta1(&mut self, handle: Handle, value: f64) -> Result<(), Error> {
        self.get_mut(handle)?.set_theta1(value);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn set_theta2(&mut self, handle: Handle, value: f64) -> Result<(), Error> {
        self.get_mut(handle)?.set_theta2(value);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn set_v1(&mut self, handle: Handle, value: f64) -> Result<(), Error> {
        self.get_mut(handle)?.set_omega1(value);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn set_v2(&mut self, handle: Handle, value: f64) -> Result<(), Error> {
        self.get_mut(handle)?.set_omega2(value);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn kinetic_energy(&self, handle: Handle) -> Result<f64, Error> {
        Ok(self.get(handle)?.kinetic_energy())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] for a bad handle.
    pub fn potential_energy(&self, handle: Handle) -> Result<f64, Error> {
        Ok(self.get(handle)?.potential_energy())
    }
}
