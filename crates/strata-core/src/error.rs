//! Error types for section generation and grid I/O.

use thiserror::Error;

use crate::field::SimulationError;

/// Errors that can abort a section generation or a grid import/export.
///
/// Generation is all-or-nothing: any error means no grid was produced.
#[derive(Error, Debug)]
pub enum SectionError {
    /// A precondition on the realization parameters failed.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The field generator failed during the given round.
    #[error("Field simulation failed in round {round}: {source}")]
    Simulation {
        round: usize,
        #[source]
        source: SimulationError,
    },

    /// Parameter JSON could not be parsed.
    #[error("Invalid parameter JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Grid file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grid matrix text is malformed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl SectionError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }
}
