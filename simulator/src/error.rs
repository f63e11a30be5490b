use thiserror::Error;

/// Everything that can go wrong inside the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("step size must be finite and at least 1e-4 days, got {0}")]
    InvalidStepSize(f64),
    #[error("target time {0} is not finite")]
    InvalidTarget(f64),
    #[error("kepler solver did not converge (dt = {dt}, mu = {mu})")]
    KeplerNonConvergence { dt: f64, mu: f64 },
    #[error("a system needs a primary body")]
    Empty,
}
