//! Crate-level error types.

use std::fmt;

/// Errors produced by the molgeo crate.
#[derive(Debug)]
pub enum MolGeoError {
    /// Invalid input passed to a density computation.
    Density(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MolGeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Density(msg) => write!(f, "density error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MolGeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MolGeoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
