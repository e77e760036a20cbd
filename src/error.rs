//! Error types for problem construction and input handling.

use std::io;
use thiserror::Error;

/// Errors raised while building a problem instance or reading its input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    #[error("location `{location}` is declared in both `{first}` and `{second}`")]
    DuplicateLocation {
        location: String,
        first: String,
        second: String,
    },

    #[error("area `{0}` is declared twice")]
    DuplicateRegion(String),

    #[error("area `{0}` has no locations")]
    EmptyRegion(String),

    #[error("home location `{0}` does not belong to any area")]
    UnknownHome(String),

    #[error("problem declares no areas")]
    NoRegions,

    #[error("flight cost {0} exceeds the 32-bit limit")]
    CostTooLarge(u64),

    #[error("too many {0} for 16-bit identifiers")]
    TooLarge(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
