// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Failure modes of a mapping run.
///
/// `Precondition` and `Invariant` indicate that the caller handed us something
/// malformed (or that mapper state is corrupt); the remaining kinds are
/// recoverable in the sense that the caller may retry with other parameters or
/// another cut selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The source network is not a structurally hashed AIG with well-formed
    /// choices.
    Precondition(String),
    /// The mapper rejected its configuration.
    MapperInit(String),
    /// The cut selector failed or left a reachable node without a best cut.
    MappingService(String),
    /// Reconstruction found mapper state it cannot materialize.
    Invariant(String),
    /// The materialized network failed its structural check.
    PostValidation(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Precondition(msg) => write!(f, "precondition violated: {}", msg),
            MapError::MapperInit(msg) => write!(f, "mapper initialization failed: {}", msg),
            MapError::MappingService(msg) => write!(f, "mapping service failed: {}", msg),
            MapError::Invariant(msg) => write!(f, "reconstruction invariant violated: {}", msg),
            MapError::PostValidation(msg) => write!(f, "output network failed validation: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

pub type Result<T> = std::result::Result<T, MapError>;
