//! PostgreSQL Claim Ledger Adapter
//!
//! Implements `ClaimLedgerPort` on top of [`ClaimsRepository`]. Duplicate
//! (food, receiver) inserts surface as `PortError::Conflict` from the unique
//! constraint. Inserts and decisions each run inside one of the repository's
//! transactions.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, FoodId, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_claims::{
    Claim, ClaimDecision, ClaimLedgerPort, ClaimStatus, ClaimWithFood, DecisionOutcome, InsertOutcome,
};

use crate::adapters::food::{row_to_food, status_from_db as food_status_from_db};
use crate::adapters::ping;
use crate::error::to_port_error;
use crate::repositories::claims::{
    ClaimRow, ClaimStatus as DbClaimStatus, ClaimWithFoodRow, ClaimsRepository, DecisionResult, InsertResult,
};

/// PostgreSQL-backed implementation of the ClaimLedgerPort trait
#[derive(Debug, Clone)]
pub struct PostgresClaimLedger {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresClaimLedger {}

#[async_trait]
impl HealthCheckable for PostgresClaimLedger {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-claim-ledger").await
    }
}

#[async_trait]
impl ClaimLedgerPort for PostgresClaimLedger {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id, food_id = %claim.food_id))]
    async fn insert_claim(&self, claim: &Claim) -> Result<InsertOutcome, PortError> {
        debug!("Inserting claim");
        let result = self
            .repository
            .insert(&claim_to_row(claim))
            .await
            .map_err(|e| to_port_error(e, "Food", claim.food_id))?;

        Ok(match result {
            InsertResult::Inserted(row) => InsertOutcome::Stored(row_to_claim(row)),
            InsertResult::FoodUnavailable(status) => InsertOutcome::FoodUnavailable(food_status_from_db(status)),
        })
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim_with_food(&self, id: ClaimId) -> Result<ClaimWithFood, PortError> {
        let row = self
            .repository
            .get_with_food(id.into())
            .await
            .map_err(|e| to_port_error(e, "Claim", id))?;
        Ok(joined_to_domain(row))
    }

    #[instrument(skip(self), fields(food_id = %food_id, receiver_id = %receiver_id))]
    async fn find_by_food_and_receiver(
        &self,
        food_id: FoodId,
        receiver_id: UserId,
    ) -> Result<Option<Claim>, PortError> {
        let row = self
            .repository
            .find_by_food_and_receiver(food_id.into(), receiver_id.into())
            .await
            .map_err(|e| to_port_error(e, "Claim", food_id))?;
        Ok(row.map(row_to_claim))
    }

    #[instrument(skip(self), fields(receiver_id = %receiver_id))]
    async fn find_by_receiver(&self, receiver_id: UserId) -> Result<Vec<ClaimWithFood>, PortError> {
        let rows = self
            .repository
            .find_by_receiver(receiver_id.into())
            .await
            .map_err(|e| to_port_error(e, "Claim", receiver_id))?;
        debug!(count = rows.len(), "Loaded receiver claims");
        Ok(rows.into_iter().map(joined_to_domain).collect())
    }

    #[instrument(skip(self, decision), fields(claim_id = %decision.claim_id, status = %decision.status))]
    async fn apply_decision(&self, decision: ClaimDecision) -> Result<DecisionOutcome, PortError> {
        let result = self
            .repository
            .apply_decision(
                decision.claim_id.into(),
                status_to_db(decision.status),
                decision.decided_at,
            )
            .await
            .map_err(|e| to_port_error(e, "Claim", decision.claim_id))?;

        Ok(match result {
            DecisionResult::Applied(row) => DecisionOutcome::Applied(row_to_claim(row)),
            DecisionResult::AlreadyDecided(status) => {
                DecisionOutcome::ClaimAlreadyDecided(status_from_db(status))
            }
            DecisionResult::FoodUnavailable(status) => {
                DecisionOutcome::FoodUnavailable(food_status_from_db(status))
            }
        })
    }
}

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        food_id: claim.food_id.into(),
        receiver_id: claim.receiver_id.into(),
        status: status_to_db(claim.status),
        created_at: claim.created_at,
        decided_at: claim.decided_at,
    }
}

fn row_to_claim(row: ClaimRow) -> Claim {
    Claim {
        id: ClaimId::from(row.claim_id),
        food_id: FoodId::from(row.food_id),
        receiver_id: UserId::from(row.receiver_id),
        status: status_from_db(row.status),
        created_at: row.created_at,
        decided_at: row.decided_at,
    }
}

fn joined_to_domain(row: ClaimWithFoodRow) -> ClaimWithFood {
    let (claim, food) = row.split();
    ClaimWithFood {
        claim: row_to_claim(claim),
        food: row_to_food(food),
    }
}
