//! Classical orbital elements and their conversion to a Kinemat.

use crate::bodies::Kinemat;
use crate::error::SimulationError;
use euclid::default::Vector3D;

/// The classical six. Angles are in radians, `a` is in AU.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis
    pub a: f64,
    /// Eccentricity
    pub e: f64,
    /// Inclination
    pub inc: f64,
    /// Longitude of the ascending node (Omega)
    pub node: f64,
    /// Argument of periapsis (omega)
    pub periapsis: f64,
    /// True anomaly (f)
    pub true_anomaly: f64,
}

impl OrbitalElements {
    /// Only bound, non-degenerate orbits are accepted.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let all = [
            self.a,
            self.e,
            self.inc,
            self.node,
            self.periapsis,
            self.true_anomaly,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidElements(
                "elements must be finite".to_string(),
            ));
        }
        if self.a <= 0.0 {
            return Err(SimulationError::InvalidElements(format!(
                "semi-major axis must be positive, got {}",
                self.a
            )));
        }
        if self.e < 0.0 || self.e >= 1.0 {
            return Err(SimulationError::InvalidElements(format!(
                "eccentricity must be in [0, 1), got {}",
                self.e
            )));
        }
        Ok(())
    }

    /// Position and velocity of a body of mass `mass` on this orbit around
    /// `primary`, which has mass `primary_mass`. `g` is Newton's constant.
    pub fn to_kinemat(
        &self,
        g: f64,
        primary_mass: f64,
        mass: f64,
        primary: &Kinemat,
    ) -> Result<Kinemat, SimulationError> {
        self.validate()?;
        let mu = g * (primary_mass + mass);
        if !(mu > 0.0) {
            return Err(SimulationError::InvalidElements(format!(
                "central mass must be positive, got {}",
                primary_mass + mass
            )));
        }

        let p = self.a * (1.0 - self.e * self.e);
        let r = p / (1.0 + self.e * self.true_anomaly.cos());
        let v0 = (mu / p).sqrt();

        let (s_node, c_node) = self.node.sin_cos();
        let (s_peri, c_peri) = self.periapsis.sin_cos();
        let (s_f, c_f) = self.true_anomaly.sin_cos();
        let (s_inc, c_inc) = self.inc.sin_cos();

        // Argument of latitude u = omega + f
        let c_u = c_peri * c_f - s_peri * s_f;
        let s_u = s_peri * c_f + c_peri * s_f;

        let pos = Vector3D::new(
            r * (c_node * c_u - s_node * s_u * c_inc),
            r * (s_node * c_u + c_node * s_u * c_inc),
            r * s_u * s_inc,
        );
        let vel = Vector3D::new(
            v0 * ((self.e + c_f) * (-c_inc * c_peri * s_node - c_node * s_peri)
                - s_f * (c_peri * c_node - c_inc * s_peri * s_node)),
            v0 * ((self.e + c_f) * (c_inc * c_peri * c_node - s_node * s_peri)
                - s_f * (c_peri * s_node + c_inc * s_peri * c_node)),
            v0 * ((self.e + c_f) * c_peri * s_inc - s_f * s_inc * s_peri),
        );

        Ok(Kinemat::new(
            primary.pos + pos,
            primary.vel + vel,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::default::Point3D;

    fn circular(inc: f64) -> OrbitalElements {
        OrbitalElements {
            a: 1.0,
            e: 0.0,
            inc,
            node: 0.0,
            periapsis: 0.0,
            true_anomaly: 0.0,
        }
    }

    #[test]
    fn circular_orbit_starts_on_x_axis() {
        let k = circular(0.0)
            .to_kinemat(1.0, 1.0, 0.0, &Kinemat::zero())
            .unwrap();
        assert!((k.pos.x - 1.0).abs() < 1e-15);
        assert!(k.pos.y.abs() < 1e-15);
        assert!((k.vel.y - 1.0).abs() < 1e-15);
    }

    #[test]
    fn inclination_lifts_velocity_out_of_plane() {
        let k = circular(std::f64::consts::FRAC_PI_2)
            .to_kinemat(1.0, 1.0, 0.0, &Kinemat::zero())
            .unwrap();
        assert!(k.vel.y.abs() < 1e-15);
        assert!((k.vel.z - 1.0).abs() < 1e-15);
    }

    #[test]
    fn offsets_by_the_primary() {
        let primary = Kinemat::new(Point3D::new(2.0, 0.0, 0.0), Vector3D::new(0.0, 0.5, 0.0));
        let k = circular(0.0).to_kinemat(1.0, 1.0, 0.0, &primary).unwrap();
        assert!((k.pos.x - 3.0).abs() < 1e-15);
        assert!((k.vel.y - 1.5).abs() < 1e-15);
    }

    #[test]
    fn rejects_unbound_orbits() {
        let mut el = circular(0.0);
        el.e = 1.2;
        assert!(el.validate().is_err());
        el.e = 0.1;
        el.a = -1.0;
        assert!(el.validate().is_err());
        el.a = f64::NAN;
        assert!(el.validate().is_err());
    }
}
