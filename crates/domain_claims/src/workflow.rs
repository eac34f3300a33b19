//! Claim workflow engine
//!
//! Orchestrates the claim lifecycle against the food registry and the claim
//! ledger. All mutation of claims, and the claim-driven mutation of foods,
//! goes through here.
//!
//! ```text
//! create:        food exists -> Available -> not own food -> no prior claim -> insert Pending
//! update_status: Approved|Rejected -> claim exists -> caller is donor -> still Pending -> apply
//! ```
//!
//! Approving a claim does not touch other pending claims on the same food.
//! Those receivers see the food's Claimed status instead.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, Clock, FoodId, PortError, UserId};
use domain_food::FoodRegistryPort;

use crate::authorization;
use crate::claim::{Claim, ClaimStatus, ClaimWithFood};
use crate::error::ClaimError;
use crate::ports::{ClaimDecision, ClaimLedgerPort, DecisionOutcome, InsertOutcome};

/// Validates and applies claim operations
#[derive(Clone)]
pub struct ClaimWorkflowEngine {
    foods: Arc<dyn FoodRegistryPort>,
    claims: Arc<dyn ClaimLedgerPort>,
    clock: Arc<dyn Clock>,
}

impl ClaimWorkflowEngine {
    pub fn new(
        foods: Arc<dyn FoodRegistryPort>,
        claims: Arc<dyn ClaimLedgerPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { foods, claims, clock }
    }

    /// Submits a claim by `receiver_id` against `food_id`
    ///
    /// # Errors
    ///
    /// - `FoodNotFound` if the listing does not exist
    /// - `FoodNotAvailable` if it is Claimed or Expired, including when it
    ///   leaves Available between the check and the insert
    /// - `SelfClaim` if the receiver is the listing's donor
    /// - `DuplicateClaim` if the receiver already claimed it, including when a
    ///   concurrent submission wins the storage-level uniqueness check
    #[instrument(skip(self), fields(food_id = %food_id, receiver_id = %receiver_id))]
    pub async fn create(&self, food_id: FoodId, receiver_id: UserId) -> Result<Claim, ClaimError> {
        let food = self.foods.get_food(food_id).await.map_err(|e| match e {
            PortError::NotFound { .. } => ClaimError::FoodNotFound(food_id),
            other => ClaimError::Storage(other),
        })?;

        if !food.is_available() {
            return Err(ClaimError::FoodNotAvailable);
        }
        if food.is_owned_by(receiver_id) {
            return Err(ClaimError::SelfClaim);
        }
        if self
            .claims
            .find_by_food_and_receiver(food_id, receiver_id)
            .await?
            .is_some()
        {
            return Err(ClaimError::DuplicateClaim);
        }

        let claim = Claim::submit(food_id, receiver_id, self.clock.now());
        let outcome = self.claims.insert_claim(&claim).await.map_err(|e| match e {
            PortError::Conflict { .. } => ClaimError::DuplicateClaim,
            PortError::NotFound { .. } => ClaimError::FoodNotFound(food_id),
            other => ClaimError::Storage(other),
        })?;
        let stored = match outcome {
            InsertOutcome::Stored(claim) => claim,
            InsertOutcome::FoodUnavailable(status) => {
                warn!(food_status = %status, "food left Available before the claim was stored");
                return Err(ClaimError::FoodNotAvailable);
            }
        };

        info!(claim_id = %stored.id, "claim submitted");
        Ok(stored)
    }

    /// Records the donor's decision on a claim
    ///
    /// On approval the referenced food becomes Claimed in the same atomic
    /// write. If the food is no longer Available by then, nothing changes and
    /// `FoodNotAvailable` is returned.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` unless `new_status` is Approved or Rejected
    /// - `ClaimNotFound` if the claim does not exist
    /// - `NotFoodDonor` if `actor_id` does not own the claim's food
    /// - `AlreadyDecided` if the claim is no longer Pending
    /// - `FoodNotAvailable` if an approval finds the food already taken
    #[instrument(skip(self), fields(claim_id = %claim_id, actor_id = %actor_id, status = %new_status))]
    pub async fn update_status(
        &self,
        claim_id: ClaimId,
        actor_id: UserId,
        new_status: ClaimStatus,
    ) -> Result<Claim, ClaimError> {
        if !new_status.is_decision() {
            return Err(ClaimError::InvalidStatus(new_status.to_string()));
        }

        let ClaimWithFood { claim, food } = self
            .claims
            .get_claim_with_food(claim_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound { .. } => ClaimError::ClaimNotFound(claim_id),
                other => ClaimError::Storage(other),
            })?;

        if authorization::require_owner(actor_id, food.donor_id).is_err() {
            warn!(food_id = %food.id, "claim decision attempted by non-owner");
            return Err(ClaimError::NotFoodDonor);
        }
        if !claim.is_pending() {
            return Err(ClaimError::AlreadyDecided(claim.status));
        }

        let decision = ClaimDecision {
            claim_id,
            status: new_status,
            decided_at: self.clock.now(),
        };
        match self.claims.apply_decision(decision).await.map_err(|e| match e {
            PortError::NotFound { .. } => ClaimError::ClaimNotFound(claim_id),
            other => ClaimError::Storage(other),
        })? {
            DecisionOutcome::Applied(updated) => {
                info!(food_id = %updated.food_id, "claim decided");
                Ok(updated)
            }
            DecisionOutcome::ClaimAlreadyDecided(status) => Err(ClaimError::AlreadyDecided(status)),
            DecisionOutcome::FoodUnavailable(food_status) => {
                warn!(food_id = %food.id, %food_status, "approval lost to current food status");
                Err(ClaimError::FoodNotAvailable)
            }
        }
    }

    /// All claims held by `receiver_id`, each with its food, newest first
    #[instrument(skip(self), fields(receiver_id = %receiver_id))]
    pub async fn list_mine(&self, receiver_id: UserId) -> Result<Vec<ClaimWithFood>, ClaimError> {
        Ok(self.claims.find_by_receiver(receiver_id).await?)
    }
}

impl std::fmt::Debug for ClaimWorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimWorkflowEngine").field("clock", &self.clock).finish_non_exhaustive()
    }
}
