//! The root of this crate doesn't do much.
//! It just re-exports its contents.

pub mod builder;
pub use builder::{SystemBuilder, SystemBuilderEntry};
pub mod deserialize;
mod error;
pub mod prefabs; // prefabs::bodies::whatever
pub use deserialize::*;
pub use error::LoadError;

#[macro_use]
extern crate lazy_static;

use simulator::bodies::Orbiter;
use simulator::{units, IntegratorKind, PlanetarySystem};

/// Everything needed to start a simulation.
#[derive(Clone, Debug)]
pub struct SystemDescription {
    /// The calendar instant (UTC) that simulation time 0 refers to,
    /// as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
    pub epoch: String,
    pub integrator: IntegratorKind,
    /// Integrator step size in days
    pub step_size: f64,
    /// Constructed orbiters, primary first.
    pub orbiters: Vec<Orbiter>,
}

impl SystemDescription {
    /// Hand the orbiters to a fresh simulation.
    pub fn build_system(&self) -> Result<PlanetarySystem, LoadError> {
        let system = PlanetarySystem::new(self.orbiters.clone(), units::gravitational_constant())?
            .with_integrator(self.integrator)
            .with_step_size(self.step_size)?;
        Ok(system)
    }
}

/// 2024-07-18 17:30 UTC, JD 2460510.229769. The prefab elements are osculating at this instant.
pub const DEFAULT_EPOCH: &str = "2024-07-18 17:30:52.0416";
