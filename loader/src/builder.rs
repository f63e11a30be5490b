//! Lets you construct a planetary system from orbital elements more easily.

use crate::LoadError;
use euclid::default::Vector3D;
use simulator::bodies::*;
use simulator::elements::OrbitalElements;

/// Use this struct to construct a planetary system easily
#[derive(Clone, Debug, Default)]
pub struct SystemBuilder {
    /// The stuff in the system, in the order it gets added
    entries: Vec<SystemBuilderEntry>,
}

impl SystemBuilder {
    /// Make a new empty Builder.
    pub fn new() -> Self {
        SystemBuilder {
            entries: Vec::new(),
        }
    }

    /// Add an entry to the Builder.
    pub fn add(&mut self, entry: SystemBuilderEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calculates the positions and velocities of all entries, and returns them as a Vec
    /// suitable for passing to PlanetarySystem::new().
    /// Each orbit is around the center of mass of everything added before it,
    /// with all of that mass at the center. `g` is Newton's constant.
    pub fn construct(self, g: f64) -> Result<Vec<Orbiter>, LoadError> {
        use SystemBuilderEntry as SBE;
        let mut out: Vec<Orbiter> = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let orbiter = match entry {
                SBE::Primary(body) => {
                    if !out.is_empty() {
                        return Err(LoadError::MisplacedPrimary(body.name));
                    }
                    Orbiter(body, Kinemat::zero())
                }
                SBE::Orbit(body, elements) => {
                    if out.is_empty() {
                        return Err(LoadError::NothingToOrbit(body.name));
                    }
                    let (interior_mass, interior) = center_of_mass(&out);
                    let kmat = elements.to_kinemat(g, interior_mass, body.mass, &interior)?;
                    Orbiter(body, kmat)
                }
                SBE::Placed(orbiter) => orbiter,
            };
            out.push(orbiter);
        }

        Ok(out)
    }
}

/// Total mass and mass-weighted kinemat of some orbiters.
fn center_of_mass(orbiters: &[Orbiter]) -> (f64, Kinemat) {
    let mut mass = 0.0;
    let mut pos = Vector3D::zero();
    let mut vel = Vector3D::zero();
    for Orbiter(body, kmat) in orbiters {
        mass += body.mass;
        pos += kmat.pos.to_vector() * body.mass;
        vel += kmat.vel * body.mass;
    }
    if mass == 0.0 {
        return (0.0, orbiters[0].1);
    }
    (mass, Kinemat::new((pos / mass).to_point(), vel / mass))
}

/// One entry in a SystemBuilder
#[derive(Clone, Debug)]
pub enum SystemBuilderEntry {
    /// The body everything else orbits. Starts at rest at the origin.
    Primary(Body),
    /// A body on an orbit around everything added before it.
    Orbit(Body, OrbitalElements),
    /// A body with its position and velocity already known.
    Placed(Orbiter),
}
