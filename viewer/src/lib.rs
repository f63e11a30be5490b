//! Shows where Jupiter's four big moons are at any instant, and which of
//! them are hidden behind or crossing the planet.

pub mod config;
pub mod controller;
pub mod epoch;
mod error;
pub mod projection;
pub mod propagation;
pub mod render;
pub mod terminal;

pub use controller::{Action, Controller, ControllerState, ViewConfig};
pub use error::ViewerError;
pub use projection::{Layer, Projection};
pub use propagation::Session;
pub use render::{AssetStore, Frame, Renderer};
