//! Food domain errors

use thiserror::Error;

use core_kernel::{ErrorKind, FoodId, PortError};
use crate::food::FoodStatus;

/// Errors that can occur in the food domain
#[derive(Debug, Error)]
pub enum FoodError {
    #[error("food not found: {0}")]
    NotFound(FoodId),

    #[error("{0}")]
    Validation(String),

    #[error("invalid food status transition from {from} to {to}")]
    InvalidStatusTransition { from: FoodStatus, to: FoodStatus },

    #[error("food storage failure: {0}")]
    Storage(#[source] PortError),
}

impl FoodError {
    /// Broad category used by transport layers
    pub fn kind(&self) -> ErrorKind {
        match self {
            FoodError::NotFound(_) => ErrorKind::NotFound,
            FoodError::Validation(_) => ErrorKind::Validation,
            FoodError::InvalidStatusTransition { .. } => ErrorKind::InvalidState,
            FoodError::Storage(_) => ErrorKind::Server,
        }
    }
}

impl From<PortError> for FoodError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation { message, .. } => FoodError::Validation(message),
            other => FoodError::Storage(other),
        }
    }
}
