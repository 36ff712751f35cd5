//! Front-end errors.

use thiserror::Error;

/// Failures of the terminal front end.
#[derive(Debug, Error)]
pub enum TuiError {
    /// The terminal could not be set up, drawn to, or read from.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
