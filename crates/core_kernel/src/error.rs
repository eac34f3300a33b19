//! Error categories shared across domains

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a domain error
///
/// Domain error enums map each variant onto one of these so that transport
/// layers can choose a response without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// Referenced entity does not exist
    NotFound,
    /// Caller lacks the role or ownership required
    Forbidden,
    /// Request collides with existing data
    Conflict,
    /// Entity is not in a state that permits the operation
    InvalidState,
    /// Unexpected infrastructure failure
    Server,
}

impl ErrorKind {
    /// Returns true for errors the caller caused and can correct
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Server)
    }

    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Server => "server_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
