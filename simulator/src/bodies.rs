//! Handles bodies and such

use euclid::default::{Point3D, Vector3D};

/// The representation of a body, like a planet or a moon.
/// Doesn't store its position or velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    /// In Jupiter masses
    pub mass: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// Color is stored as 0xRRGGBB
    pub outline: u32,
}

/// A Kinemat holds all the kinematic information about something.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Kinemat {
    pub pos: Point3D<f64>,
    pub vel: Vector3D<f64>,
}

impl Kinemat {
    pub fn new(pos: Point3D<f64>, vel: Vector3D<f64>) -> Self {
        Self { pos, vel }
    }

    pub fn zero() -> Self {
        Self {
            pos: Point3D::origin(),
            vel: Vector3D::zero(),
        }
    }

    /// Move along the current velocity for `dt`.
    pub fn drift(&mut self, dt: f64) {
        self.pos = self.pos + self.vel * dt;
    }

    /// Change velocity by `acc` for `dt`.
    pub fn kick(&mut self, dt: f64, acc: Vector3D<f64>) {
        self.vel = self.vel + acc * dt;
    }

    /// This kinemat seen from `origin`.
    pub fn relative_to(&self, origin: &Kinemat) -> Kinemat {
        Kinemat::new(
            (self.pos - origin.pos).to_point(),
            self.vel - origin.vel,
        )
    }
}

/// An Orbiter is a combination of a Body and a Kinemat.
/// In other words, a thing and where it is (and how fast it's going.)
#[derive(Clone, Debug)]
pub struct Orbiter(pub Body, pub Kinemat);
