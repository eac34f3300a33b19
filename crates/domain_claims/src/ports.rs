//! Claim Ledger Ports
//!
//! The `ClaimLedgerPort` trait defines what the workflow engine needs from
//! claim storage. Implementations must provide two guarantees that the engine
//! cannot provide on its own under concurrent requests:
//!
//! - **Uniqueness**: at most one claim per (food, receiver) pair. A second
//!   insert for the same pair fails with `PortError::Conflict` even if both
//!   callers passed the engine's existence check.
//! - **Availability at insert**: `insert_claim` re-reads the food's status
//!   under the same lock or transaction as the write. A food that stopped
//!   being Available after the engine's check yields
//!   `InsertOutcome::FoodUnavailable` and nothing is stored.
//! - **Atomic approval cascade**: `apply_decision` with `Approved` sets the
//!   claim status and moves the food from Available to Claimed as one unit.
//!   If the food is no longer Available, nothing is written.
//!
//! # Adapters
//!
//! - **Internal Adapter**: PostgreSQL transaction in `infra_db`
//! - **Mock Adapter**: in-memory, behind the `mock` feature

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, DomainPort, FoodId, HealthCheckable, PortError, UserId};
use domain_food::FoodStatus;

use crate::claim::{Claim, ClaimStatus, ClaimWithFood};

/// A donor's decision to record against a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimDecision {
    pub claim_id: ClaimId,
    /// Approved or Rejected
    pub status: ClaimStatus,
    pub decided_at: DateTime<Utc>,
}

/// Result of an attempted claim insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The claim was stored
    Stored(Claim),
    /// The food was no longer Available at the time of the write
    FoodUnavailable(FoodStatus),
}

/// Result of an attempted decision write
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// The decision (and, for approvals, the food cascade) was committed
    Applied(Claim),
    /// The claim had already left Pending; nothing was written
    ClaimAlreadyDecided(ClaimStatus),
    /// The approval lost to the food's current status; nothing was written
    FoodUnavailable(FoodStatus),
}

/// The port trait for claim storage
#[async_trait]
pub trait ClaimLedgerPort: DomainPort + HealthCheckable {
    /// Persists a new claim if its food is still Available
    ///
    /// # Errors
    ///
    /// - `PortError::NotFound` if the food does not exist
    /// - `PortError::Conflict` if a claim for the same (food, receiver) exists
    async fn insert_claim(&self, claim: &Claim) -> Result<InsertOutcome, PortError>;

    /// Retrieves a claim together with its food, or `PortError::NotFound`
    async fn get_claim_with_food(&self, id: ClaimId) -> Result<ClaimWithFood, PortError>;

    /// Finds the claim a receiver holds against a listing, if any
    async fn find_by_food_and_receiver(
        &self,
        food_id: FoodId,
        receiver_id: UserId,
    ) -> Result<Option<Claim>, PortError>;

    /// All claims held by a receiver, each with its food, newest first
    async fn find_by_receiver(&self, receiver_id: UserId) -> Result<Vec<ClaimWithFood>, PortError>;

    /// Records a decision, cascading approvals into the food atomically
    async fn apply_decision(&self, decision: ClaimDecision) -> Result<DecisionOutcome, PortError>;
}

/// Sorts claims newest first; ties on the timestamp fall back to the
/// time-ordered claim id
pub fn sort_newest_first(claims: &mut [ClaimWithFood]) {
    claims.sort_by(|a, b| {
        b.claim
            .created_at
            .cmp(&a.claim.created_at)
            .then_with(|| b.claim.id.cmp(&a.claim.id))
    });
}

/// Mock implementation of ClaimLedgerPort for testing
///
/// Shares its food table with a `MockFoodRegistry` so that the approval
/// cascade is visible through the registry. Write paths take the claim lock
/// before the food lock.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};
    use domain_food::ports::mock::{FoodTable, MockFoodRegistry};

    /// In-memory mock implementation of ClaimLedgerPort
    #[derive(Debug, Clone)]
    pub struct MockClaimLedger {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        foods: FoodTable,
    }

    impl MockClaimLedger {
        /// Creates an empty ledger backed by the registry's food table
        pub fn new(registry: &MockFoodRegistry) -> Self {
            Self {
                claims: Arc::new(RwLock::new(HashMap::new())),
                foods: registry.table(),
            }
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }
    }

    impl DomainPort for MockClaimLedger {}

    #[async_trait]
    impl HealthCheckable for MockClaimLedger {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claim-ledger".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimLedgerPort for MockClaimLedger {
        async fn insert_claim(&self, claim: &Claim) -> Result<InsertOutcome, PortError> {
            let mut claims = self.claims.write().await;
            let foods = self.foods.read().await;

            let food = foods
                .get(&claim.food_id)
                .ok_or_else(|| PortError::not_found("Food", claim.food_id))?;
            if !food.is_available() {
                return Ok(InsertOutcome::FoodUnavailable(food.status));
            }
            let duplicate = claims
                .values()
                .any(|c| c.food_id == claim.food_id && c.receiver_id == claim.receiver_id);
            if duplicate {
                return Err(PortError::conflict("claim for this food and receiver already exists"));
            }

            claims.insert(claim.id, claim.clone());
            Ok(InsertOutcome::Stored(claim.clone()))
        }

        async fn get_claim_with_food(&self, id: ClaimId) -> Result<ClaimWithFood, PortError> {
            let claims = self.claims.read().await;
            let claim = claims
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            let food = self
                .foods
                .read()
                .await
                .get(&claim.food_id)
                .cloned()
                .ok_or_else(|| PortError::internal(format!("claim {} references missing food", id)))?;
            Ok(ClaimWithFood { claim, food })
        }

        async fn find_by_food_and_receiver(
            &self,
            food_id: FoodId,
            receiver_id: UserId,
        ) -> Result<Option<Claim>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .find(|c| c.food_id == food_id && c.receiver_id == receiver_id)
                .cloned())
        }

        async fn find_by_receiver(&self, receiver_id: UserId) -> Result<Vec<ClaimWithFood>, PortError> {
            let claims = self.claims.read().await;
            let foods = self.foods.read().await;
            let mut results: Vec<ClaimWithFood> = claims
                .values()
                .filter(|c| c.receiver_id == receiver_id)
                .filter_map(|c| {
                    foods.get(&c.food_id).map(|food| ClaimWithFood {
                        claim: c.clone(),
                        food: food.clone(),
                    })
                })
                .collect();
            sort_newest_first(&mut results);
            Ok(results)
        }

        async fn apply_decision(&self, decision: ClaimDecision) -> Result<DecisionOutcome, PortError> {
            let mut claims = self.claims.write().await;
            let mut foods = self.foods.write().await;

            let claim = claims
                .get_mut(&decision.claim_id)
                .ok_or_else(|| PortError::not_found("Claim", decision.claim_id))?;
            if !claim.is_pending() {
                return Ok(DecisionOutcome::ClaimAlreadyDecided(claim.status));
            }

            if decision.status == ClaimStatus::Approved {
                let food = foods
                    .get_mut(&claim.food_id)
                    .ok_or_else(|| PortError::not_found("Food", claim.food_id))?;
                if !food.is_available() {
                    return Ok(DecisionOutcome::FoodUnavailable(food.status));
                }
                food.mark_claimed(decision.decided_at)
                    .map_err(|e| PortError::internal(e.to_string()))?;
            }

            claim
                .decide(decision.status, decision.decided_at)
                .map_err(|e| PortError::validation(e.to_string()))?;
            Ok(DecisionOutcome::Applied(claim.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockClaimLedger;
    use chrono::Duration;
    use domain_food::ports::mock::MockFoodRegistry;
    use domain_food::{Food, FoodRegistryPort, GeoLocation, NewFood};

    async fn seeded() -> (MockFoodRegistry, MockClaimLedger, Food) {
        let now = Utc::now();
        let food = Food::register(
            UserId::new(),
            NewFood {
                name: "Soup".to_string(),
                description: None,
                quantity: "4 litres".to_string(),
                expires_at: now + Duration::hours(5),
                location: GeoLocation::new(48.8566, 2.3522),
            },
            now,
        )
        .unwrap();
        let registry = MockFoodRegistry::with_foods(vec![food.clone()]).await;
        let ledger = MockClaimLedger::new(&registry);
        (registry, ledger, food)
    }

    async fn submit(ledger: &MockClaimLedger, food_id: FoodId) -> Claim {
        match ledger
            .insert_claim(&Claim::submit(food_id, UserId::new(), Utc::now()))
            .await
            .unwrap()
        {
            InsertOutcome::Stored(claim) => claim,
            other => panic!("claim not stored: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mock_rejects_duplicate_pair() {
        let (_, ledger, food) = seeded().await;
        let receiver = UserId::new();

        let first = ledger.insert_claim(&Claim::submit(food.id, receiver, Utc::now())).await.unwrap();
        assert!(matches!(first, InsertOutcome::Stored(_)));
        let second = ledger.insert_claim(&Claim::submit(food.id, receiver, Utc::now())).await;

        assert!(second.unwrap_err().is_conflict());
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_mock_approval_cascades_to_food() {
        let (registry, ledger, food) = seeded().await;
        let claim = submit(&ledger, food.id).await;

        let outcome = ledger
            .apply_decision(ClaimDecision {
                claim_id: claim.id,
                status: ClaimStatus::Approved,
                decided_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, DecisionOutcome::Applied(ref c) if c.status == ClaimStatus::Approved));
        assert_eq!(registry.get_food(food.id).await.unwrap().status, FoodStatus::Claimed);
    }

    #[tokio::test]
    async fn test_mock_second_approval_loses() {
        let (_, ledger, food) = seeded().await;
        let first = submit(&ledger, food.id).await;
        let second = submit(&ledger, food.id).await;
        let approve = |claim_id| ClaimDecision {
            claim_id,
            status: ClaimStatus::Approved,
            decided_at: Utc::now(),
        };

        ledger.apply_decision(approve(first.id)).await.unwrap();
        let outcome = ledger.apply_decision(approve(second.id)).await.unwrap();

        assert_eq!(outcome, DecisionOutcome::FoodUnavailable(FoodStatus::Claimed));
        let untouched = ledger.get_claim_with_food(second.id).await.unwrap();
        assert_eq!(untouched.claim.status, ClaimStatus::Pending);
    }

    #[tokio::test]
    async fn test_mock_reject_leaves_food_available() {
        let (registry, ledger, food) = seeded().await;
        let claim = submit(&ledger, food.id).await;

        ledger
            .apply_decision(ClaimDecision {
                claim_id: claim.id,
                status: ClaimStatus::Rejected,
                decided_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(registry.get_food(food.id).await.unwrap().status, FoodStatus::Available);
    }

    #[tokio::test]
    async fn test_mock_insert_rechecks_food_status() {
        let (registry, ledger, food) = seeded().await;
        assert!(registry.mark_claimed(food.id, Utc::now()).await.unwrap());

        let outcome = ledger
            .insert_claim(&Claim::submit(food.id, UserId::new(), Utc::now()))
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::FoodUnavailable(FoodStatus::Claimed));
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_mock_insert_for_missing_food() {
        let (_, ledger, _) = seeded().await;

        let err = ledger
            .insert_claim(&Claim::submit(FoodId::new(), UserId::new(), Utc::now()))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
