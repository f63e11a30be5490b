//! Lets you load a planetary system from a file.

use serde::Deserialize;

/// A Vector3D or Point3D.
#[derive(Deserialize)]
struct Vec3D(f64, f64, f64);

/// The whole file.
#[derive(Deserialize)]
struct RawSystem {
    #[serde(default = "default_epoch")]
    epoch: String,
    #[serde(default = "default_integrator")]
    integrator: String,
    #[serde(default = "default_step_size")]
    dt: f64,
    bodies: Vec<Entry>,
}

/// One body. With `elements` it orbits everything listed before it,
/// with `kinemat` it is placed directly, with neither it is the primary.
#[derive(Deserialize)]
struct Entry {
    body: Body,
    #[serde(default)]
    elements: Option<Elements>,
    #[serde(default)]
    kinemat: Option<Kinemat>,
}

fn default_epoch() -> String {
    crate::DEFAULT_EPOCH.to_string()
}

fn default_integrator() -> String {
    IntegratorKind::default().name().to_string()
}

fn default_step_size() -> f64 {
    simulator::DEFAULT_STEP_SIZE
}

/// A Body in space
#[derive(Deserialize)]
#[serde(untagged)]
enum Body {
    Prefab(String), // A pre-made pre-defined Body
    Custom {
        name: String,
        mass: f64,
        #[serde(default = "default_color")]
        color: u32,
        #[serde(default = "default_color")]
        outline: u32,
    },
}

fn default_color() -> u32 {
    0xcccccc
}

/// Orbital elements, named like the classical symbols.
#[derive(Deserialize)]
#[serde(untagged)]
enum Elements {
    Prefab(String),
    Custom {
        a: f64,
        #[serde(default)]
        e: f64,
        #[serde(default)]
        inc: f64,
        #[serde(default, rename = "Omega")]
        node: f64,
        #[serde(default)]
        omega: f64,
        #[serde(default)]
        f: f64,
    },
}

#[derive(Deserialize)]
struct Kinemat {
    pos: Vec3D,
    vel: Vec3D,
}

use crate::builder::{SystemBuilder, SystemBuilderEntry as SBE};
use crate::{LoadError, SystemDescription};
use euclid::default::{Point3D, Vector3D};
use simulator::{bodies, elements::OrbitalElements, units, IntegratorKind};
use tracing::debug;

/// Parses a file and returns the ingredients for a planetary system.
pub fn load(contents: &str) -> Result<SystemDescription, LoadError> {
    let raw: RawSystem = json5::from_str(contents)?;
    let integrator = IntegratorKind::from_name(&raw.integrator)
        .ok_or_else(|| LoadError::UnknownIntegrator(raw.integrator.clone()))?;

    let mut builder = SystemBuilder::new();
    for entry in raw.bodies {
        builder.add(to_builder_entry(entry)?);
    }
    debug!(bodies = builder.len(), integrator = integrator.name(), "loaded system file");

    Ok(SystemDescription {
        epoch: raw.epoch,
        integrator,
        step_size: raw.dt,
        orbiters: builder.construct(units::gravitational_constant())?,
    })
}

/// Helper function to convert from serde to real
fn to_builder_entry(entry: Entry) -> Result<SBE, LoadError> {
    let body = match entry.body {
        Body::Prefab(id) => get_body_from_id(&id)?,
        Body::Custom {
            name,
            mass,
            color,
            outline,
        } => bodies::Body {
            name,
            mass,
            color,
            outline,
        },
    };

    Ok(match (entry.elements, entry.kinemat) {
        (Some(elements), _) => SBE::Orbit(
            body,
            match elements {
                Elements::Prefab(id) => get_elements_from_id(&id)?,
                Elements::Custom {
                    a,
                    e,
                    inc,
                    node,
                    omega,
                    f,
                } => OrbitalElements {
                    a,
                    e,
                    inc,
                    node,
                    periapsis: omega,
                    true_anomaly: f,
                },
            },
        ),
        (None, Some(kinemat)) => SBE::Placed(bodies::Orbiter(
            body,
            bodies::Kinemat {
                pos: Point3D::new(kinemat.pos.0, kinemat.pos.1, kinemat.pos.2),
                vel: Vector3D::new(kinemat.vel.0, kinemat.vel.1, kinemat.vel.2),
            },
        )),
        (None, None) => SBE::Primary(body),
    })
}

macro_rules! maker {
    (
        $module:ident => $out:ty; $($name:ident),*
    ) => {
        {
            let mut h: HashMap<String, fn() -> $out> = HashMap::new();
            $( h.insert(stringify!($name).to_string(), crate::prefabs::$module::$name); )*
            h
        }
    };
}

use std::collections::HashMap;

lazy_static! {
    static ref BODIES: HashMap<String, fn() -> bodies::Body> =
        maker![bodies => bodies::Body; jupiter, io, europa, ganymede, callisto];
    static ref ELEMENTS: HashMap<String, fn() -> OrbitalElements> =
        maker![elements => OrbitalElements; io, europa, ganymede, callisto];
}

/// Gets a premade Body from a string
fn get_body_from_id(id: &str) -> Result<bodies::Body, LoadError> {
    BODIES
        .get(&id.to_ascii_lowercase())
        .map(|make| make())
        .ok_or_else(|| LoadError::UnknownBody(id.to_string()))
}

/// Gets premade orbital elements from a string
fn get_elements_from_id(id: &str) -> Result<OrbitalElements, LoadError> {
    ELEMENTS
        .get(&id.to_ascii_lowercase())
        .map(|make| make())
        .ok_or_else(|| LoadError::UnknownElements(id.to_string()))
}
