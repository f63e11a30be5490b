//! Viewer settings, read from a json5 file.

use crate::error::ViewerError;

use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_SETTINGS_PATH: &str = "viewer.json5";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where the body images and the cloud live
    pub assets_dir: PathBuf,
    /// How far a time jump goes
    pub jump_hours: f64,
    pub clouds: bool,
    pub white_background: bool,
    /// Fixes the cloud overlay's dice. Random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            assets_dir: PathBuf::from("figs"),
            jump_hours: 12.0,
            clouds: false,
            white_background: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn parse(contents: &str) -> Result<Settings, ViewerError> {
        let settings: Settings = json5::from_str(contents)
            .map_err(|err| ViewerError::ConfigurationFault(format!("viewer settings: {}", err)))?;
        if !settings.jump_hours.is_finite() {
            return Err(ViewerError::ConfigurationFault(format!(
                "viewer settings: jump_hours must be finite, got {}",
                settings.jump_hours
            )));
        }
        Ok(settings)
    }

    /// Read settings from `path`. No file at all means the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings, ViewerError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Settings::parse(&contents),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no viewer settings, using defaults");
                Ok(Settings::default())
            }
            Err(err) => Err(ViewerError::ConfigurationFault(format!(
                "reading {}: {}",
                path.display(),
                err
            ))),
        }
    }
}
