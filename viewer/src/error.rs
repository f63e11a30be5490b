use thiserror::Error;

/// Everything a user action can run into.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// The date string didn't parse. Nothing changed.
    #[error("improper date and time {input:?}, expected e.g. 2024-07-18 22:30:30.55")]
    InvalidTimeFormat { input: String },
    /// A setting was out of range. Nothing changed.
    #[error("invalid {setting}: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },
    /// The system itself is broken. The session can't go on.
    #[error("configuration fault: {0}")]
    ConfigurationFault(String),
    /// The propagation engine gave up mid-integration. The session can't go on.
    #[error("propagation fault: {0}")]
    PropagationFault(String),
    /// The rendering surface failed even without images.
    #[error("render fault: {0}")]
    RenderFault(String),
}

impl ViewerError {
    /// Whether the session can carry on after this.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ViewerError::InvalidTimeFormat { .. } | ViewerError::InvalidSetting { .. } => true,
            ViewerError::ConfigurationFault(_)
            | ViewerError::PropagationFault(_)
            | ViewerError::RenderFault(_) => false,
        }
    }
}

impl From<loader::LoadError> for ViewerError {
    fn from(err: loader::LoadError) -> Self {
        ViewerError::ConfigurationFault(err.to_string())
    }
}
