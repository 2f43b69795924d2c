// Central Error Type for probes

use thiserror::Error;

/// Probe-level error type
///
/// An unreachable host is NOT an error: it is a successful
/// [`ProbeResult`](crate::domain::ProbeResult) with `alive = false`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Spawn configuration error: {0}")]
    SpawnConfiguration(#[source] Box<ProbeError>),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process error: {0}")]
    Process(String),

    #[error("Invalid parser state: cannot {operation} while {state}")]
    InvalidParserState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("No active ping process")]
    NoActiveProcess,

    #[error("A probe is already running on this controller")]
    ProbeAlreadyRunning,
}

impl ProbeError {
    /// Wrap a planning failure that happened before anything was spawned
    pub fn spawn_configuration(cause: ProbeError) -> Self {
        ProbeError::SpawnConfiguration(Box::new(cause))
    }
}

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
