//! Prefabricated bodies, orbits and systems.
//! Masses are in Jupiter masses, lengths in AU, angles in radians.

pub mod bodies {
    use simulator::bodies::Body;

    /// Returns Jupiter.
    pub fn jupiter() -> Body {
        Body {
            name: "Jupiter".to_string(),
            mass: 1.0,
            color: 0xd8ca9d,   // tan
            outline: 0xa57c55, // brown
        }
    }

    /// Returns Io.
    pub fn io() -> Body {
        Body {
            name: "Io".to_string(),
            mass: 4.7e-5,
            color: 0xf4e36b,   // sulfur yellow
            outline: 0xc9a227, // ochre
        }
    }

    /// Returns Europa.
    pub fn europa() -> Body {
        Body {
            name: "Europa".to_string(),
            mass: 2.5e-5,
            color: 0xd8cfc0,   // ice
            outline: 0x8b7d6b, // cracks
        }
    }

    /// Returns Ganymede.
    pub fn ganymede() -> Body {
        Body {
            name: "Ganymede".to_string(),
            mass: 7.8e-5,
            color: 0x9c8f80,   // gray brown
            outline: 0x5b5149, // dark gray
        }
    }

    /// Returns Callisto.
    pub fn callisto() -> Body {
        Body {
            name: "Callisto".to_string(),
            mass: 5.7e-5,
            color: 0x5e5248,   // dark brown
            outline: 0x3a322c, // darker brown
        }
    }
}

/// Osculating elements at `DEFAULT_EPOCH`, each relative to the bodies added before it.
pub mod elements {
    use simulator::elements::OrbitalElements;

    pub fn io() -> OrbitalElements {
        OrbitalElements {
            a: 0.002818623004285437,
            e: 0.004079857301041492,
            inc: 0.03804794156031389,
            node: -0.38893968645378835,
            periapsis: 4.864278675471462,
            true_anomaly: 5.682659640352345,
        }
    }

    pub fn europa() -> OrbitalElements {
        OrbitalElements {
            a: 0.004487980554823025,
            e: 0.00974154548746722,
            inc: 0.039931236158043795,
            node: -0.5877637812980877,
            periapsis: 1.9223130235217791,
            true_anomaly: 5.988730260389364,
        }
    }

    pub fn ganymede() -> OrbitalElements {
        OrbitalElements {
            a: 0.007152056499240089,
            e: 0.0021576877565359837,
            inc: 0.04066564317570219,
            node: -0.35600170771928724,
            periapsis: 6.192000690608995,
            true_anomaly: 4.78191323984481,
        }
    }

    pub fn callisto() -> OrbitalElements {
        OrbitalElements {
            a: 0.012580426532110564,
            e: 0.007542503282625529,
            inc: 0.03403046222325111,
            node: -0.40443704900755467,
            periapsis: 0.5510916429261528,
            true_anomaly: 2.4575789851499366,
        }
    }
}

pub mod systems {
    use super::{bodies, elements};
    use crate::builder::{SystemBuilder, SystemBuilderEntry as SBE};
    use crate::{LoadError, SystemDescription, DEFAULT_EPOCH};
    use simulator::{units, IntegratorKind, DEFAULT_STEP_SIZE};

    /// Jupiter and the four Galilean moons, innermost first.
    pub fn galilean_builder() -> SystemBuilder {
        let mut builder = SystemBuilder::new();
        builder
            .add(SBE::Primary(bodies::jupiter()))
            .add(SBE::Orbit(bodies::io(), elements::io()))
            .add(SBE::Orbit(bodies::europa(), elements::europa()))
            .add(SBE::Orbit(bodies::ganymede(), elements::ganymede()))
            .add(SBE::Orbit(bodies::callisto(), elements::callisto()));
        builder
    }

    /// The Galilean system as it stood at `DEFAULT_EPOCH`.
    pub fn galilean() -> Result<SystemDescription, LoadError> {
        Ok(SystemDescription {
            epoch: DEFAULT_EPOCH.to_string(),
            integrator: IntegratorKind::WisdomHolman,
            step_size: DEFAULT_STEP_SIZE,
            orbiters: galilean_builder().construct(units::gravitational_constant())?,
        })
    }
}
