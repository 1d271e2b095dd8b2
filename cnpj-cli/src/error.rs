//! Error types for the command line front end.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core error (invalid identifier, confirmation failure)
    #[error(transparent)]
    Core(#[from] cnpj_core::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
