//! Flattens the system onto the screen and works out who hides behind whom.
//!
//! The screen shows the x axis across and the z axis (out of the orbital
//! plane) upwards; y is thrown away. A moon with z >= 0 is on our side of
//! Jupiter.

use crate::error::ViewerError;
use crate::propagation::BODY_COUNT;

use euclid::default::{Point2D, Point3D};
use simulator::bodies::Body;

/// Half the width of Jupiter's disk along x, in AU.
pub const DISK_HALF_WIDTH: f64 = 0.000265;
/// Jupiter's diameter in AU. Moon distances are reported in these.
pub const PRIMARY_DIAMETER: f64 = 0.000954559041;

/// Which layer a body is composited into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Further away than Jupiter.
    Behind,
    /// Over Jupiter's disk, drawn beneath Jupiter's image.
    TransitingDisk,
    /// Nearer than Jupiter and clear of its disk.
    Front,
}

/// Where a moon ends up. Zero counts as our side.
pub fn classify(pos: Point3D<f64>) -> Layer {
    let facing = pos.z >= 0.0;
    if facing && pos.x >= -DISK_HALF_WIDTH && pos.x <= DISK_HALF_WIDTH {
        Layer::TransitingDisk
    } else if facing {
        Layer::Front
    } else {
        Layer::Behind
    }
}

/// Separation from the primary along x only, in primary diameters,
/// rounded to 5 decimals. Never negative.
pub fn distance(moon: Point3D<f64>, primary: Point3D<f64>) -> f64 {
    round_to_places(((moon.x - primary.x) / PRIMARY_DIAMETER).abs(), 5)
}

/// Rounds the exact decimal value of `value`: 0.002675 is really
/// 0.0026749999... and goes down to 0.00267.
fn round_to_places(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

pub fn to_screen(pos: Point3D<f64>) -> Point2D<f64> {
    Point2D::new(pos.x, pos.z)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedBody {
    /// Index in the system, 0 is the primary.
    pub index: usize,
    pub name: String,
    pub position: Point2D<f64>,
    pub layer: Layer,
    /// `None` for the primary.
    pub distance: Option<f64>,
}

impl ProjectedBody {
    pub fn is_primary(&self) -> bool {
        self.index == 0
    }

    /// Compositing order, bottom first: behind, transiting, the primary, front.
    pub fn draw_rank(&self) -> u8 {
        if self.is_primary() {
            return 2;
        }
        match self.layer {
            Layer::Behind => 0,
            Layer::TransitingDisk => 1,
            Layer::Front => 3,
        }
    }

    /// Stacking for plain markers, which only care which side of the primary a moon is on.
    pub fn marker_order(&self) -> u8 {
        if self.is_primary() {
            return 2;
        }
        match self.layer {
            Layer::Behind => 1,
            Layer::TransitingDisk | Layer::Front => 3,
        }
    }
}

/// One frame's worth of projected bodies, in system order.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    bodies: Vec<ProjectedBody>,
}

impl Projection {
    /// Project fresh positions. `bodies` names them, in the same order.
    pub fn project(positions: &[Point3D<f64>], bodies: &[Body]) -> Result<Self, ViewerError> {
        if positions.len() != BODY_COUNT || bodies.len() != BODY_COUNT {
            return Err(ViewerError::ConfigurationFault(format!(
                "projection needs {} bodies, got {} positions for {} bodies",
                BODY_COUNT,
                positions.len(),
                bodies.len()
            )));
        }
        let primary = positions[0];
        let projected = positions
            .iter()
            .zip(bodies.iter())
            .enumerate()
            .map(|(index, (&pos, body))| {
                let is_primary = index == 0;
                ProjectedBody {
                    index,
                    name: body.name.clone(),
                    position: to_screen(pos),
                    // The primary is its own layer; see draw_rank
                    layer: if is_primary { Layer::Front } else { classify(pos) },
                    distance: if is_primary {
                        None
                    } else {
                        Some(distance(pos, primary))
                    },
                }
            })
            .collect();
        Ok(Projection { bodies: projected })
    }

    pub fn bodies(&self) -> &[ProjectedBody] {
        &self.bodies
    }

    pub fn primary(&self) -> &ProjectedBody {
        &self.bodies[0]
    }

    pub fn moons(&self) -> &[ProjectedBody] {
        &self.bodies[1..]
    }

    /// Bottom to top. Ties keep system order.
    pub fn draw_order(&self) -> Vec<&ProjectedBody> {
        let mut order: Vec<&ProjectedBody> = self.bodies.iter().collect();
        order.sort_by_key(|body| body.draw_rank());
        order
    }
}
