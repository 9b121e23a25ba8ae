use thiserror::Error;

/// Errors raised by the wheel engine.
///
/// Configuration errors are raised at the boundary, before any spin can start.
/// Random-source and setup errors abort a spin and leave the controller idle.
/// Storage errors are reported to callers that want them, but the host layer
/// downgrades them to log lines so they never block spinning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WheelError {
    #[error("a wheel needs at least 2 sections, got {count}")]
    TooFewSections { count: usize },

    #[error("section id `{0}` is used more than once")]
    DuplicateSectionId(String),

    #[error("no section with id `{0}`")]
    UnknownSection(String),

    #[error("invalid color `{0}`, expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("spin duration must be between {min}s and {max}s, got {got}s")]
    InvalidDuration { got: f64, min: f64, max: f64 },

    #[error("full-turn range {min}..={max} is empty")]
    InvalidTurnRange { min: u32, max: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("random source failed: {0}")]
    RandomSource(String),

    #[error("spin setup failed: {0}")]
    SpinSetup(String),

    #[error("cannot change the wheel while it is spinning")]
    SpinInProgress,

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("could not parse stored data: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for WheelError {
    fn from(err: serde_json::Error) -> Self {
        WheelError::Parse(err.to_string())
    }
}

impl WheelError {
    /// Whether this error rejects configuration (as opposed to a runtime failure).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WheelError::TooFewSections { .. }
                | WheelError::DuplicateSectionId(_)
                | WheelError::UnknownSection(_)
                | WheelError::InvalidColor(_)
                | WheelError::InvalidDuration { .. }
                | WheelError::InvalidTurnRange { .. }
                | WheelError::InvalidConfig(_)
        )
    }
}
