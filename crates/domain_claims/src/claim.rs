//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, FoodId, UserId};
use domain_food::Food;
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Submitted by the receiver, awaiting the donor
    Pending,
    /// Accepted by the donor
    Approved,
    /// Declined by the donor
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    /// True for the statuses a donor may set
    pub fn is_decision(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ClaimStatus::Pending),
            "Approved" => Ok(ClaimStatus::Approved),
            "Rejected" => Ok(ClaimStatus::Rejected),
            other => Err(ClaimError::InvalidStatus(other.to_string())),
        }
    }
}

/// A receiver's request to take a food listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Listing being claimed
    pub food_id: FoodId,
    /// Receiver who submitted the claim
    pub receiver_id: UserId,
    /// Status
    pub status: ClaimStatus,
    /// When the claim was submitted
    pub created_at: DateTime<Utc>,
    /// When the donor approved or rejected it
    pub decided_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// Creates a new pending claim
    pub fn submit(food_id: FoodId, receiver_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            id: ClaimId::new_v7(),
            food_id,
            receiver_id,
            status: ClaimStatus::Pending,
            created_at: at,
            decided_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    /// Records the donor's decision
    ///
    /// Only a pending claim can be decided, and only to Approved or Rejected.
    pub fn decide(&mut self, status: ClaimStatus, at: DateTime<Utc>) -> Result<(), ClaimError> {
        if !status.is_decision() {
            return Err(ClaimError::InvalidStatus(status.to_string()));
        }
        if !self.is_pending() {
            return Err(ClaimError::AlreadyDecided(self.status));
        }
        self.status = status;
        self.decided_at = Some(at);
        Ok(())
    }
}

/// A claim together with the listing it refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimWithFood {
    pub claim: Claim,
    pub food: Food,
}
