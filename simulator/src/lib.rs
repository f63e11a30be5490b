//! Handles the simulation of a planetary system

pub mod bodies;
pub mod elements;
mod error;
pub mod integrator;
pub mod units;

pub use error::SimulationError;
pub use integrator::IntegratorKind;

use crate::bodies::{Body, Kinemat, Orbiter};
use euclid::default::{Point3D, Vector3D};
use tracing::trace;

/// What a propagation engine has to offer.
/// Anything implementing this can stand in for `PlanetarySystem`.
pub trait Propagator {
    /// The current simulation time, in days.
    fn time(&self) -> f64;

    /// Integrate forwards or backwards until the simulation time is exactly `target`.
    /// Returns the number of steps taken.
    /// On error the state is left as it was.
    fn integrate_to(&mut self, target: f64) -> Result<usize, SimulationError>;

    /// Shift everything so the center of mass sits still at the origin.
    fn move_to_com(&mut self);

    /// Where everything is, in the order it was added.
    fn positions(&self) -> Vec<Point3D<f64>>;

    fn step_size(&self) -> f64;

    fn set_step_size(&mut self, dt: f64) -> Result<(), SimulationError>;
}

pub struct PlanetarySystem {
    /// Index 0 is the primary.
    bodies: Vec<Body>,
    /// Parallel to `bodies`.
    kinemats: Vec<Kinemat>,
    /// Simulation time in days
    time: f64,
    /// Largest step the integrator may take, in days
    dt: f64,
    /// Newton's constant in whatever units the orbiters use
    g: f64,
    integrator: IntegratorKind,
}

impl PlanetarySystem {
    pub fn new(orbiters: Vec<Orbiter>, g: f64) -> Result<Self, SimulationError> {
        if orbiters.is_empty() {
            return Err(SimulationError::Empty);
        }
        let mut bodies = Vec::with_capacity(orbiters.len());
        let mut kinemats = Vec::with_capacity(orbiters.len());
        for Orbiter(body, kmat) in orbiters {
            bodies.push(body);
            kinemats.push(kmat);
        }
        Ok(PlanetarySystem {
            bodies,
            kinemats,
            time: 0.0,
            dt: DEFAULT_STEP_SIZE,
            g,
            integrator: IntegratorKind::default(),
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_step_size(mut self, dt: f64) -> Result<Self, SimulationError> {
        self.set_step_size(dt)?;
        Ok(self)
    }

    pub fn integrator(&self) -> IntegratorKind {
        self.integrator
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }


    /// The mass-weighted average position and velocity.
    pub fn center_of_mass(&self) -> Kinemat {
        let mut total_mass = 0.0;
        let mut pos = Vector3D::zero();
        let mut vel = Vector3D::zero();
        for (body, kmat) in self.bodies.iter().zip(self.kinemats.iter()) {
            total_mass += body.mass;
            pos += kmat.pos.to_vector() * body.mass;
            vel += kmat.vel * body.mass;
        }
        Kinemat::new((pos / total_mass).to_point(), vel / total_mass)
    }

    /// Total kinetic plus potential energy.
    pub fn energy(&self) -> f64 {
        let mut energy = 0.0;
        for (i, (body, kmat)) in self.bodies.iter().zip(self.kinemats.iter()).enumerate() {
            energy += 0.5 * body.mass * kmat.vel.square_length();
            for (other, other_kmat) in self.bodies.iter().zip(self.kinemats.iter()).skip(i + 1) {
                let dist = (other_kmat.pos - kmat.pos).length();
                energy -= self.g * body.mass * other.mass / dist;
            }
        }
        energy
    }
}

impl Propagator for PlanetarySystem {
    fn time(&self) -> f64 {
        self.time
    }

    fn integrate_to(&mut self, target: f64) -> Result<usize, SimulationError> {
        if !target.is_finite() {
            return Err(SimulationError::InvalidTarget(target));
        }
        let span = target - self.time;
        if span == 0.0 {
            return Ok(0);
        }
        // Uniform steps, so going back over the same span retraces them
        let steps = (span.abs() / self.dt).ceil().max(1.0) as usize;
        let h = span / steps as f64;

        let mut scratch = self.kinemats.clone();
        for _ in 0..steps {
            self.integrator
                .step(self.g, &self.bodies, &mut scratch, h)?;
        }
        self.kinemats = scratch;
        trace!(from = self.time, to = target, steps, "integrated");
        self.time = target;
        Ok(steps)
    }

    fn move_to_com(&mut self) {
        let com = self.center_of_mass();
        for kmat in self.kinemats.iter_mut() {
            *kmat = kmat.relative_to(&com);
        }
    }

    fn positions(&self) -> Vec<Point3D<f64>> {
        self.kinemats.iter().map(|kmat| kmat.pos).collect()
    }

    fn step_size(&self) -> f64 {
        self.dt
    }

    fn set_step_size(&mut self, dt: f64) -> Result<(), SimulationError> {
        if !(dt.is_finite() && dt >= MIN_STEP_SIZE) {
            return Err(SimulationError::InvalidStepSize(dt));
        }
        self.dt = dt;
        Ok(())
    }
}

/// In days.
pub const DEFAULT_STEP_SIZE: f64 = 0.05;
/// Anything finer makes a single day take millions of steps.
pub const MIN_STEP_SIZE: f64 = 1e-4;
