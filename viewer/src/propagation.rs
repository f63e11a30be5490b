//! Drives the propagation engine from calendar instants.

use crate::epoch::{parse_instant, Epoch};
use crate::error::ViewerError;

use euclid::default::Point3D;
use loader::SystemDescription;
use simulator::bodies::Body;
use simulator::{PlanetarySystem, Propagator};
use time::PrimitiveDateTime;
use tracing::{debug, info};

/// Jupiter and four moons, always.
pub const BODY_COUNT: usize = 5;

/// One user's simulation. Owns the engine state outright;
/// only `advance_to*` and `set_step_size` change it.
pub struct Session<P: Propagator = PlanetarySystem> {
    propagator: P,
    bodies: Vec<Body>,
    epoch: Epoch,
    /// Whether the state has been put in the barycentric frame yet
    centered: bool,
}

impl Session<PlanetarySystem> {
    /// Build the engine from a system description.
    pub fn initialize(description: &SystemDescription) -> Result<Self, ViewerError> {
        let epoch = Epoch::parse(&description.epoch)?;
        let system = description.build_system()?;
        info!(
            epoch = %description.epoch,
            integrator = system.integrator().name(),
            dt = system.step_size(),
            "session started"
        );
        let bodies = system.bodies().to_vec();
        Session::with_propagator(system, bodies, epoch)
    }
}

impl<P: Propagator> Session<P> {
    /// Wrap any engine. `bodies` describes what the engine holds, in the same order.
    pub fn with_propagator(propagator: P, bodies: Vec<Body>, epoch: Epoch) -> Result<Self, ViewerError> {
        let count = propagator.positions().len();
        if bodies.len() != BODY_COUNT || count != BODY_COUNT {
            return Err(ViewerError::ConfigurationFault(format!(
                "expected {} bodies, got {} described and {} simulated",
                BODY_COUNT,
                bodies.len(),
                count
            )));
        }
        Ok(Session {
            propagator,
            bodies,
            epoch,
            centered: false,
        })
    }

    /// Parse `entry` and move the simulation to that instant.
    /// A string that doesn't parse leaves everything as it was.
    pub fn advance_to(&mut self, entry: &str) -> Result<PrimitiveDateTime, ViewerError> {
        let instant = parse_instant(entry)?;
        self.advance_to_instant(instant)?;
        Ok(instant)
    }

    /// Move the simulation to `instant`, forwards or backwards, then recenter
    /// on the barycenter. Returns the new simulation time.
    pub fn advance_to_instant(&mut self, instant: PrimitiveDateTime) -> Result<f64, ViewerError> {
        let target = self.epoch.simulation_time(instant);
        if self.centered && target == self.propagator.time() {
            return Ok(target);
        }
        let steps = self
            .propagator
            .integrate_to(target)
            .map_err(|err| ViewerError::PropagationFault(err.to_string()))?;
        self.propagator.move_to_com();
        self.centered = true;
        debug!(%instant, simulation_time = target, steps, "advanced");
        Ok(target)
    }

    /// Cartesian positions, primary first.
    pub fn positions(&self) -> Vec<Point3D<f64>> {
        self.propagator.positions()
    }

    pub fn simulation_time(&self) -> f64 {
        self.propagator.time()
    }

    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn step_size(&self) -> f64 {
        self.propagator.step_size()
    }

    /// Takes effect on the next advance.
    pub fn set_step_size(&mut self, dt: f64) -> Result<(), ViewerError> {
        self.propagator
            .set_step_size(dt)
            .map_err(|err| ViewerError::InvalidSetting {
                setting: "step size",
                reason: err.to_string(),
            })
    }
}
