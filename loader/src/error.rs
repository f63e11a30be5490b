use simulator::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not parse system file: {0}")]
    Parse(#[from] json5::Error),
    #[error("no prefab body named {0}")]
    UnknownBody(String),
    #[error("no prefab orbital elements named {0}")]
    UnknownElements(String),
    #[error("no integrator named {0}")]
    UnknownIntegrator(String),
    #[error("{0} has no position or orbit, but only the first body may be the primary")]
    MisplacedPrimary(String),
    #[error("{0} orbits nothing; the first body must be the primary")]
    NothingToOrbit(String),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
