use simulator::bodies::{Body, Kinemat, Orbiter};
use simulator::elements::OrbitalElements;
use simulator::{IntegratorKind, PlanetarySystem, Propagator, SimulationError, MIN_STEP_SIZE};

use euclid::default::{Point3D, Vector3D};

fn body(name: &str, mass: f64) -> Body {
    Body {
        name: name.to_string(),
        mass,
        color: 0xffffff,
        outline: 0xffffff,
    }
}

/// A heavy primary with two light moons on circular-ish orbits, G = 1.
fn three_body_system(integrator: IntegratorKind) -> PlanetarySystem {
    let primary = Kinemat::zero();
    let inner = OrbitalElements {
        a: 1.0,
        e: 0.01,
        inc: 0.03,
        node: 0.2,
        periapsis: 1.0,
        true_anomaly: 0.5,
    }
    .to_kinemat(1.0, 1.0, 1e-4, &primary)
    .unwrap();
    let outer = OrbitalElements {
        a: 1.6,
        e: 0.005,
        inc: 0.02,
        node: -0.4,
        periapsis: 2.0,
        true_anomaly: 4.0,
    }
    .to_kinemat(1.0, 1.0 + 1e-4, 5e-5, &primary)
    .unwrap();
    PlanetarySystem::new(
        vec![
            Orbiter(body("primary", 1.0), primary),
            Orbiter(body("inner", 1e-4), inner),
            Orbiter(body("outer", 5e-5), outer),
        ],
        1.0,
    )
    .unwrap()
    .with_integrator(integrator)
    .with_step_size(0.02)
    .unwrap()
}

fn max_separation(a: &[Point3D<f64>], b: &[Point3D<f64>]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(p, q)| (*p - *q).length())
        .fold(0.0, f64::max)
}

#[test]
fn empty_system_is_rejected() {
    assert!(matches!(
        PlanetarySystem::new(Vec::new(), 1.0),
        Err(SimulationError::Empty)
    ));
}

#[test]
fn lands_exactly_on_target_time() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    let steps = system.integrate_to(1.234).unwrap();
    assert_eq!(system.time(), 1.234);
    // ceil(1.234 / 0.02)
    assert_eq!(steps, 62);
    system.integrate_to(-0.5).unwrap();
    assert_eq!(system.time(), -0.5);
}

#[test]
fn same_target_twice_changes_nothing() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    system.integrate_to(3.0).unwrap();
    let first = system.positions();
    assert_eq!(system.integrate_to(3.0).unwrap(), 0);
    assert_eq!(system.positions(), first);
}

#[test]
fn identical_systems_integrate_identically() {
    let mut a = three_body_system(IntegratorKind::WisdomHolman);
    let mut b = three_body_system(IntegratorKind::WisdomHolman);
    a.integrate_to(17.3).unwrap();
    b.integrate_to(17.3).unwrap();
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn wisdom_holman_retraces_its_steps() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    let start = system.positions();
    system.integrate_to(40.0).unwrap();
    assert!(max_separation(&start, &system.positions()) > 0.1);
    system.integrate_to(0.0).unwrap();
    assert!(max_separation(&start, &system.positions()) < 1e-9);
}

#[test]
fn leapfrog_retraces_its_steps() {
    let mut system = three_body_system(IntegratorKind::Leapfrog);
    let start = system.positions();
    system.integrate_to(-25.0).unwrap();
    system.integrate_to(0.0).unwrap();
    assert!(max_separation(&start, &system.positions()) < 1e-9);
}

#[test]
fn wisdom_holman_conserves_energy() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    let before = system.energy();
    system.integrate_to(200.0).unwrap();
    let drift = ((system.energy() - before) / before).abs();
    assert!(drift < 1e-6, "energy drift {}", drift);
}

#[test]
fn wisdom_holman_matches_kepler_for_a_lone_moon() {
    // With one massless-ish moon the map is exact two-body motion
    let primary = Kinemat::zero();
    let moon = Kinemat::new(Point3D::new(1.0, 0.0, 0.0), Vector3D::new(0.0, 1.0, 0.0));
    let mut system = PlanetarySystem::new(
        vec![
            Orbiter(body("primary", 1.0), primary),
            Orbiter(body("moon", 0.0), moon),
        ],
        1.0,
    )
    .unwrap()
    .with_step_size(0.1)
    .unwrap();
    system.integrate_to(std::f64::consts::PI).unwrap();
    let pos = system.positions()[1];
    assert!((pos.x + 1.0).abs() < 1e-10);
    assert!(pos.y.abs() < 1e-10);
}

#[test]
fn move_to_com_centers_position_and_velocity() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    system.move_to_com();
    let com = system.center_of_mass();
    assert!(com.pos.to_vector().length() < 1e-15);
    assert!(com.vel.length() < 1e-15);
}

#[test]
fn step_size_must_be_sensible() {
    let mut system = three_body_system(IntegratorKind::Leapfrog);
    assert!(system.set_step_size(0.0).is_err());
    assert!(system.set_step_size(1e-12).is_err());
    assert!(system.set_step_size(MIN_STEP_SIZE / 2.0).is_err());
    assert!(system.set_step_size(-0.05).is_err());
    assert!(system.set_step_size(f64::NAN).is_err());
    assert_eq!(system.step_size(), 0.02);
    system.set_step_size(MIN_STEP_SIZE).unwrap();
    assert_eq!(system.step_size(), MIN_STEP_SIZE);
    system.set_step_size(0.1).unwrap();
    assert_eq!(system.step_size(), 0.1);
}

#[test]
fn non_finite_target_leaves_state_alone() {
    let mut system = three_body_system(IntegratorKind::WisdomHolman);
    let before = system.positions();
    assert!(system.integrate_to(f64::INFINITY).is_err());
    assert_eq!(system.time(), 0.0);
    assert_eq!(system.positions(), before);
}
