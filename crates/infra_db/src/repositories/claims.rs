//! Claims repository implementation
//!
//! This module provides database access for claims and the claim-decision
//! transaction that cascades approvals into the food listing.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::food::{FoodRepository, FoodRow, FoodStatus};

const CLAIM_COLUMNS: &str = "claim_id, food_id, receiver_id, status, created_at, decided_at";

const CLAIM_WITH_FOOD_SELECT: &str = r#"
    SELECT
        c.claim_id, c.food_id, c.receiver_id, c.status AS claim_status,
        c.created_at AS claim_created_at, c.decided_at,
        f.donor_id, f.name, f.description, f.quantity, f.status AS food_status,
        f.expires_at, f.latitude, f.longitude,
        f.created_at AS food_created_at, f.updated_at AS food_updated_at
    FROM claims c
    JOIN foods f ON f.food_id = c.food_id
"#;

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a claim while its food is still Available
    ///
    /// The food row is share-locked before the insert, so an approval
    /// committing in between either finishes first (and the insert is refused)
    /// or waits for this transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` when the food does not exist, `DuplicateEntry` when the
    /// (food, receiver) pair already has a claim
    pub async fn insert(&self, claim: &ClaimRow) -> Result<InsertResult, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let food_status = FoodRepository::lock_status_in(&mut *tx, claim.food_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Food", claim.food_id))?;
        if food_status != FoodStatus::Available {
            return Ok(InsertResult::FoodUnavailable(food_status));
        }

        let sql = format!(
            r#"
            INSERT INTO claims (claim_id, food_id, receiver_id, status, created_at, decided_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim.claim_id)
            .bind(claim.food_id)
            .bind(claim.receiver_id)
            .bind(claim.status)
            .bind(claim.created_at)
            .bind(claim.decided_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(InsertResult::Inserted(row))
    }

    /// Retrieves a claim joined with its food
    pub async fn get_with_food(&self, claim_id: Uuid) -> Result<ClaimWithFoodRow, DatabaseError> {
        let sql = format!("{CLAIM_WITH_FOOD_SELECT} WHERE c.claim_id = $1");
        sqlx::query_as::<_, ClaimWithFoodRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Finds the claim a receiver holds against a listing
    pub async fn find_by_food_and_receiver(
        &self,
        food_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE food_id = $1 AND receiver_id = $2");
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(food_id)
            .bind(receiver_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All claims held by a receiver, newest first
    pub async fn find_by_receiver(&self, receiver_id: Uuid) -> Result<Vec<ClaimWithFoodRow>, DatabaseError> {
        let sql = format!(
            "{CLAIM_WITH_FOOD_SELECT} WHERE c.receiver_id = $1 ORDER BY c.created_at DESC, c.claim_id DESC"
        );
        let rows = sqlx::query_as::<_, ClaimWithFoodRow>(&sql)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Records a decision on a pending claim
    ///
    /// Runs in one transaction: the claim row is locked, its status checked,
    /// and for approvals the food is conditionally moved to Claimed before
    /// the claim is updated. Any early exit drops the transaction, rolling
    /// it back.
    pub async fn apply_decision(
        &self,
        claim_id: Uuid,
        status: ClaimStatus,
        decided_at: DateTime<Utc>,
    ) -> Result<DecisionResult, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))?;

        if current.status != ClaimStatus::Pending {
            return Ok(DecisionResult::AlreadyDecided(current.status));
        }

        if status == ClaimStatus::Approved
            && !FoodRepository::mark_claimed_in(&mut *tx, current.food_id, decided_at).await?
        {
            let food_status = FoodRepository::current_status_in(&mut *tx, current.food_id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("Food", current.food_id))?;
            return Ok(DecisionResult::FoodUnavailable(food_status));
        }

        let sql = format!(
            r#"
            UPDATE claims
            SET status = $2, decided_at = $3
            WHERE claim_id = $1
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .bind(status)
            .bind(decided_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(DecisionResult::Applied(updated))
    }
}

/// Claim status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// Database row for a claim
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub food_id: Uuid,
    pub receiver_id: Uuid,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// A claim joined with its food, as returned by the join queries
#[derive(Debug, Clone, FromRow)]
pub struct ClaimWithFoodRow {
    pub claim_id: Uuid,
    pub food_id: Uuid,
    pub receiver_id: Uuid,
    pub claim_status: ClaimStatus,
    pub claim_created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub donor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: String,
    pub food_status: FoodStatus,
    pub expires_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub food_created_at: DateTime<Utc>,
    pub food_updated_at: DateTime<Utc>,
}

impl ClaimWithFoodRow {
    /// Splits the joined row into its claim and food parts
    pub fn split(self) -> (ClaimRow, FoodRow) {
        let claim = ClaimRow {
            claim_id: self.claim_id,
            food_id: self.food_id,
            receiver_id: self.receiver_id,
            status: self.claim_status,
            created_at: self.claim_created_at,
            decided_at: self.decided_at,
        };
        let food = FoodRow {
            food_id: self.food_id,
            donor_id: self.donor_id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            status: self.food_status,
            expires_at: self.expires_at,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.food_created_at,
            updated_at: self.food_updated_at,
        };
        (claim, food)
    }
}

/// Outcome of the claim insert transaction
#[derive(Debug, Clone)]
pub enum InsertResult {
    Inserted(ClaimRow),
    FoodUnavailable(FoodStatus),
}

/// Outcome of the decision transaction
#[derive(Debug, Clone)]
pub enum DecisionResult {
    Applied(ClaimRow),
    AlreadyDecided(ClaimStatus),
    FoodUnavailable(FoodStatus),
}
