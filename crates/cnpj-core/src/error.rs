//! Error types for the CNPJ core.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the strict entry points of the core.
///
/// Everything else in the codec and the search path is total and returns
/// best-effort values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Checksum validation failed. Carries the normalized identifier.
    #[error("invalid CNPJ: {0}")]
    InvalidIdentifier(String),

    /// The confirmation responder went away without answering
    #[error("confirmation cancelled before an answer was given")]
    ConfirmationCancelled,

    /// No answer arrived within the configured window
    #[error("confirmation timed out after {0:?}")]
    ConfirmationTimedOut(Duration),
}

/// Result type alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
