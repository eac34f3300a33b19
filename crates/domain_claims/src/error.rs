//! Claims domain errors
//!
//! Every client-facing variant carries a stable reason string; callers should
//! not retry any of them. `Storage` wraps unexpected persistence failures.

use thiserror::Error;

use core_kernel::{ClaimId, ErrorKind, FoodId, PortError};
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("foodId is required")]
    MissingFoodId,

    #[error("invalid status")]
    InvalidStatus(String),

    #[error("food not found")]
    FoodNotFound(FoodId),

    #[error("claim not found")]
    ClaimNotFound(ClaimId),

    #[error("food is not available")]
    FoodNotAvailable,

    #[error("donor cannot claim own food")]
    SelfClaim,

    #[error("not authorized to update this claim")]
    NotFoodDonor,

    #[error("claim already submitted")]
    DuplicateClaim,

    #[error("claim has already been decided")]
    AlreadyDecided(ClaimStatus),

    #[error("claim storage failure: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    /// Broad category used by transport layers
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::MissingFoodId | ClaimError::InvalidStatus(_) => ErrorKind::Validation,
            ClaimError::FoodNotFound(_) | ClaimError::ClaimNotFound(_) => ErrorKind::NotFound,
            ClaimError::SelfClaim | ClaimError::NotFoodDonor => ErrorKind::Forbidden,
            ClaimError::DuplicateClaim => ErrorKind::Conflict,
            ClaimError::FoodNotAvailable | ClaimError::AlreadyDecided(_) => ErrorKind::InvalidState,
            ClaimError::Storage(_) => ErrorKind::Server,
        }
    }
}
