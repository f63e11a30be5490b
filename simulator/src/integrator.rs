//! The symplectic integrators that move a system through time.
//!
//! Both integrators are drift-kick-drift maps, so a step of `-h` undoes a
//! step of `h` up to rounding.

use crate::bodies::{Body, Kinemat};
use crate::error::SimulationError;
use euclid::default::Vector3D;

/// Which integrator a system uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntegratorKind {
    /// Wisdom-Holman map in Jacobi coordinates. Kepler motion is solved
    /// analytically, only the interactions between moons are integrated.
    WisdomHolman,
    /// Plain drift-kick-drift leapfrog in inertial coordinates.
    Leapfrog,
}

impl Default for IntegratorKind {
    fn default() -> Self {
        IntegratorKind::WisdomHolman
    }
}

impl IntegratorKind {
    /// Look an integrator up by the name used in system files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "whfast" | "wh" | "wisdom-holman" => Some(IntegratorKind::WisdomHolman),
            "leapfrog" => Some(IntegratorKind::Leapfrog),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegratorKind::WisdomHolman => "whfast",
            IntegratorKind::Leapfrog => "leapfrog",
        }
    }

    /// Advance `kinemats` by `h`. `h` may be negative.
    pub fn step(
        &self,
        g: f64,
        bodies: &[Body],
        kinemats: &mut [Kinemat],
        h: f64,
    ) -> Result<(), SimulationError> {
        match self {
            IntegratorKind::WisdomHolman => wisdom_holman_step(g, bodies, kinemats, h),
            IntegratorKind::Leapfrog => {
                leapfrog_step(g, bodies, kinemats, h);
                Ok(())
            }
        }
    }
}

/// Newtonian accelerations of every body due to every other body.
pub fn accelerations(g: f64, bodies: &[Body], kinemats: &[Kinemat]) -> Vec<Vector3D<f64>> {
    let mut acc = vec![Vector3D::zero(); kinemats.len()];
    for i in 0..kinemats.len() {
        for j in (i + 1)..kinemats.len() {
            let d = kinemats[j].pos - kinemats[i].pos;
            let dist_squared = d.square_length();
            let inv_cube = 1.0 / (dist_squared * dist_squared.sqrt());
            acc[i] += d * (g * bodies[j].mass * inv_cube);
            acc[j] -= d * (g * bodies[i].mass * inv_cube);
        }
    }
    acc
}

fn leapfrog_step(g: f64, bodies: &[Body], kinemats: &mut [Kinemat], h: f64) {
    for kmat in kinemats.iter_mut() {
        kmat.drift(h / 2.0);
    }
    let acc = accelerations(g, bodies, kinemats);
    for (kmat, a) in kinemats.iter_mut().zip(acc) {
        kmat.kick(h, a);
    }
    for kmat in kinemats.iter_mut() {
        kmat.drift(h / 2.0);
    }
}

fn wisdom_holman_step(
    g: f64,
    bodies: &[Body],
    kinemats: &mut [Kinemat],
    h: f64,
) -> Result<(), SimulationError> {
    let masses: Vec<f64> = bodies.iter().map(|b| b.mass).collect();
    let etas = interior_masses(&masses);

    let mut jacobi = to_jacobi(&masses, &etas, kinemats);
    kepler_drift(g, &etas, &mut jacobi, h / 2.0)?;

    // Interaction kick: full gravity minus the Kepler part the drift already handles
    let inertial = from_jacobi(&masses, &etas, &jacobi);
    let acc = accelerations(g, bodies, &inertial);
    let acc = acc_to_jacobi(&masses, &etas, &acc);
    for i in 1..jacobi.len() {
        let r = jacobi[i].pos.to_vector();
        let dist = r.length();
        let kepler = r * (g * etas[i] / (dist * dist * dist));
        jacobi[i].kick(h, acc[i] + kepler);
    }

    kepler_drift(g, &etas, &mut jacobi, h / 2.0)?;

    for (kmat, new) in kinemats.iter_mut().zip(from_jacobi(&masses, &etas, &jacobi)) {
        *kmat = new;
    }
    Ok(())
}

/// etas[i] is the mass of bodies 0 through i.
fn interior_masses(masses: &[f64]) -> Vec<f64> {
    masses
        .iter()
        .scan(0.0, |sum, m| {
            *sum += m;
            Some(*sum)
        })
        .collect()
}

/// Jacobi coordinates: body i relative to the center of mass of bodies 0..i.
/// Slot 0 holds the center of mass of the whole system.
fn to_jacobi(masses: &[f64], etas: &[f64], kinemats: &[Kinemat]) -> Vec<Kinemat> {
    let mut out = vec![Kinemat::zero(); kinemats.len()];
    let mut com = kinemats[0].pos.to_vector();
    let mut com_vel = kinemats[0].vel;
    for i in 1..kinemats.len() {
        out[i] = Kinemat::new(
            (kinemats[i].pos.to_vector() - com).to_point(),
            kinemats[i].vel - com_vel,
        );
        com = (com * etas[i - 1] + kinemats[i].pos.to_vector() * masses[i]) / etas[i];
        com_vel = (com_vel * etas[i - 1] + kinemats[i].vel * masses[i]) / etas[i];
    }
    out[0] = Kinemat::new(com.to_point(), com_vel);
    out
}

fn from_jacobi(masses: &[f64], etas: &[f64], jacobi: &[Kinemat]) -> Vec<Kinemat> {
    let mut out = vec![Kinemat::zero(); jacobi.len()];
    let mut com = jacobi[0].pos.to_vector();
    let mut com_vel = jacobi[0].vel;
    for i in (1..jacobi.len()).rev() {
        let share = masses[i] / etas[i];
        com -= jacobi[i].pos.to_vector() * share;
        com_vel -= jacobi[i].vel * share;
        out[i] = Kinemat::new(
            (com + jacobi[i].pos.to_vector()).to_point(),
            com_vel + jacobi[i].vel,
        );
    }
    out[0] = Kinemat::new(com.to_point(), com_vel);
    out
}

fn acc_to_jacobi(masses: &[f64], etas: &[f64], acc: &[Vector3D<f64>]) -> Vec<Vector3D<f64>> {
    let mut out = vec![Vector3D::zero(); acc.len()];
    let mut mean = acc[0];
    for i in 1..acc.len() {
        out[i] = acc[i] - mean;
        mean = (mean * etas[i - 1] + acc[i] * masses[i]) / etas[i];
    }
    out[0] = mean;
    out
}

fn kepler_drift(
    g: f64,
    etas: &[f64],
    jacobi: &mut [Kinemat],
    dt: f64,
) -> Result<(), SimulationError> {
    jacobi[0].drift(dt);
    for i in 1..jacobi.len() {
        jacobi[i] = kepler_step(g * etas[i], &jacobi[i], dt)?;
    }
    Ok(())
}

const KEPLER_MAX_ITERATIONS: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-14;
/// A solve that stalls above KEPLER_TOLERANCE but below this is still used.
const KEPLER_ACCEPTABLE: f64 = 1e-9;
const STUMPFF_SERIES_LIMIT: f64 = 0.1;
const STUMPFF_TERMS: usize = 12;

/// Exact two-body motion over `dt` in universal variables.
pub fn kepler_step(mu: f64, kmat: &Kinemat, dt: f64) -> Result<Kinemat, SimulationError> {
    if dt == 0.0 {
        return Ok(*kmat);
    }
    let r0_vec = kmat.pos.to_vector();
    let r0 = r0_vec.length();
    let sqrt_mu = mu.sqrt();
    let sigma0 = r0_vec.dot(kmat.vel) / sqrt_mu;
    let alpha = 2.0 / r0 - kmat.vel.square_length() / mu;

    let universal = |chi: f64| {
        let chi2 = chi * chi;
        let psi = chi2 * alpha;
        let (c2, c3) = stumpff(psi);
        let r = chi2 * c2 + sigma0 * chi * (1.0 - psi * c3) + r0 * (1.0 - psi * c2);
        let t = chi2 * chi * c3 + sigma0 * chi2 * c2 + r0 * chi * (1.0 - psi * c3);
        (r, t, psi, c2, c3)
    };

    let mut chi = sqrt_mu * dt / r0;
    let mut last_delta = f64::INFINITY;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let (r, t, ..) = universal(chi);
        last_delta = (sqrt_mu * dt - t) / r;
        chi += last_delta;
        if last_delta.abs() <= KEPLER_TOLERANCE * chi.abs() {
            break;
        }
    }
    if !(last_delta.abs() <= KEPLER_ACCEPTABLE * chi.abs()) {
        return Err(SimulationError::KeplerNonConvergence { dt, mu });
    }

    let (r, _, psi, c2, c3) = universal(chi);
    let chi2 = chi * chi;
    let f = 1.0 - chi2 * c2 / r0;
    let g = dt - chi2 * chi * c3 / sqrt_mu;
    let f_dot = sqrt_mu * chi * (psi * c3 - 1.0) / (r * r0);
    let g_dot = 1.0 - chi2 * c2 / r;

    Ok(Kinemat::new(
        (r0_vec * f + kmat.vel * g).to_point(),
        r0_vec * f_dot + kmat.vel * g_dot,
    ))
}

/// The Stumpff functions c2 and c3.
fn stumpff(psi: f64) -> (f64, f64) {
    if psi > STUMPFF_SERIES_LIMIT {
        let s = psi.sqrt();
        let half_sin = (s / 2.0).sin();
        (2.0 * half_sin * half_sin / psi, (s - s.sin()) / (psi * s))
    } else if psi < -STUMPFF_SERIES_LIMIT {
        let s = (-psi).sqrt();
        ((1.0 - s.cosh()) / psi, (s.sinh() - s) / (-psi * s))
    } else {
        let mut c2 = 0.0;
        let mut c3 = 0.0;
        let mut term2 = 0.5;
        let mut term3 = 1.0 / 6.0;
        for k in 0..STUMPFF_TERMS {
            c2 += term2;
            c3 += term3;
            let k = k as f64;
            term2 *= -psi / ((2.0 * k + 3.0) * (2.0 * k + 4.0));
            term3 *= -psi / ((2.0 * k + 4.0) * (2.0 * k + 5.0));
        }
        (c2, c3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::default::Point3D;
    use std::f64::consts::PI;

    fn circular_unit_orbit() -> Kinemat {
        Kinemat::new(Point3D::new(1.0, 0.0, 0.0), Vector3D::new(0.0, 1.0, 0.0))
    }

    /// c2 and c3 straight from their definitions.
    fn stumpff_by_definition(psi: f64) -> (f64, f64) {
        if psi > 0.0 {
            let s = psi.sqrt();
            ((1.0 - s.cos()) / psi, (s - s.sin()) / (psi * s))
        } else {
            let s = (-psi).sqrt();
            ((s.cosh() - 1.0) / -psi, (s.sinh() - s) / (-psi * s))
        }
    }

    #[test]
    fn stumpff_branches_agree_at_the_boundary() {
        // Each branch is checked at its own side of the limit against the same formula
        for &sign in &[1.0, -1.0] {
            for &nudge in &[1.0 - 1e-9, 1.0 + 1e-9] {
                let psi = sign * STUMPFF_SERIES_LIMIT * nudge;
                let (c2, c3) = stumpff(psi);
                let (d2, d3) = stumpff_by_definition(psi);
                assert!((c2 - d2).abs() < 1e-13, "c2({}) = {} vs {}", psi, c2, d2);
                assert!((c3 - d3).abs() < 1e-13, "c3({}) = {} vs {}", psi, c3, d3);
            }
        }
        let (c2, c3) = stumpff(0.0);
        assert_eq!(c2, 0.5);
        assert_eq!(c3, 1.0 / 6.0);
    }

    #[test]
    fn quarter_circular_orbit() {
        let k = kepler_step(1.0, &circular_unit_orbit(), PI / 2.0).unwrap();
        assert!(k.pos.x.abs() < 1e-12);
        assert!((k.pos.y - 1.0).abs() < 1e-12);
        assert!((k.vel.x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn kepler_step_runs_backwards() {
        let start = Kinemat::new(Point3D::new(1.0, 0.1, 0.02), Vector3D::new(-0.1, 1.1, 0.0));
        let there = kepler_step(1.0, &start, 3.7).unwrap();
        let back = kepler_step(1.0, &there, -3.7).unwrap();
        assert!((back.pos - start.pos).length() < 1e-12);
        assert!((back.vel - start.vel).length() < 1e-12);
    }

    #[test]
    fn jacobi_round_trip() {
        let masses = [1.0, 0.01, 0.002];
        let etas = interior_masses(&masses);
        let kinemats = [
            Kinemat::new(Point3D::new(0.1, 0.0, 0.0), Vector3D::new(0.0, -0.01, 0.0)),
            Kinemat::new(Point3D::new(1.0, 0.0, 0.1), Vector3D::new(0.0, 1.0, 0.0)),
            Kinemat::new(Point3D::new(0.0, 2.0, 0.0), Vector3D::new(-0.7, 0.0, 0.01)),
        ];
        let back = from_jacobi(&masses, &etas, &to_jacobi(&masses, &etas, &kinemats));
        for (a, b) in kinemats.iter().zip(back.iter()) {
            assert!((a.pos - b.pos).length() < 1e-14);
            assert!((a.vel - b.vel).length() < 1e-14);
        }
    }

    #[test]
    fn integrator_names() {
        assert_eq!(
            IntegratorKind::from_name("WHFast"),
            Some(IntegratorKind::WisdomHolman)
        );
        assert_eq!(
            IntegratorKind::from_name("leapfrog"),
            Some(IntegratorKind::Leapfrog)
        );
        assert_eq!(IntegratorKind::from_name("euler"), None);
    }
}
