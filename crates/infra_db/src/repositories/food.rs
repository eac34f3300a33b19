//! Food listing repository implementation
//!
//! Status changes on listings are conditional updates guarded by
//! `status = 'available'`, so concurrent writers serialize on the row lock and
//! exactly one of them observes the transition.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

const FOOD_COLUMNS: &str = r#"
    food_id, donor_id, name, description, quantity, status,
    expires_at, latitude, longitude, created_at, updated_at
"#;

/// Repository for food listings
#[derive(Debug, Clone)]
pub struct FoodRepository {
    pool: PgPool,
}

impl FoodRepository {
    /// Creates a new FoodRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a listing and returns the stored row
    pub async fn insert(&self, food: &FoodRow) -> Result<FoodRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO foods (
                food_id, donor_id, name, description, quantity, status,
                expires_at, latitude, longitude, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {FOOD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, FoodRow>(&sql)
            .bind(food.food_id)
            .bind(food.donor_id)
            .bind(&food.name)
            .bind(&food.description)
            .bind(&food.quantity)
            .bind(food.status)
            .bind(food.expires_at)
            .bind(food.latitude)
            .bind(food.longitude)
            .bind(food.created_at)
            .bind(food.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// Retrieves a listing by its identifier
    pub async fn get_by_id(&self, food_id: Uuid) -> Result<FoodRow, DatabaseError> {
        let sql = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE food_id = $1");
        sqlx::query_as::<_, FoodRow>(&sql)
            .bind(food_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Food", food_id))
    }

    /// Marks a listing Claimed if it is still Available
    ///
    /// Returns `NotFound` if the listing does not exist, otherwise whether
    /// this call made the transition.
    pub async fn mark_claimed(&self, food_id: Uuid, at: DateTime<Utc>) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        if Self::mark_claimed_in(&mut *conn, food_id, at).await? {
            return Ok(true);
        }
        Self::current_status_in(&mut *conn, food_id)
            .await?
            .map(|_| false)
            .ok_or_else(|| DatabaseError::not_found("Food", food_id))
    }

    /// Conditional Available -> Claimed update on an existing connection
    ///
    /// Used inside the claim-decision transaction.
    pub async fn mark_claimed_in(
        conn: &mut PgConnection,
        food_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE foods
            SET status = 'claimed', updated_at = $2
            WHERE food_id = $1 AND status = 'available'
            "#,
        )
        .bind(food_id)
        .bind(at)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Reads a listing's status on an existing connection
    pub async fn current_status_in(
        conn: &mut PgConnection,
        food_id: Uuid,
    ) -> Result<Option<FoodStatus>, DatabaseError> {
        let status = sqlx::query_scalar::<_, FoodStatus>("SELECT status FROM foods WHERE food_id = $1")
            .bind(food_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(status)
    }

    /// Reads a listing's status and share-locks the row until the surrounding
    /// transaction ends
    ///
    /// Concurrent status updates on the listing wait for that transaction.
    pub async fn lock_status_in(
        conn: &mut PgConnection,
        food_id: Uuid,
    ) -> Result<Option<FoodStatus>, DatabaseError> {
        let status = sqlx::query_scalar::<_, FoodStatus>(
            "SELECT status FROM foods WHERE food_id = $1 FOR SHARE",
        )
        .bind(food_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(status)
    }

    /// Expires every Available listing whose expiry is at or before `now`
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, DatabaseError> {
        let mut ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE foods
            SET status = 'expired', updated_at = $1
            WHERE status = 'available' AND expires_at <= $1
            RETURNING food_id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        ids.sort();
        Ok(ids)
    }
}

/// Food status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "food_status", rename_all = "snake_case")]
pub enum FoodStatus {
    Available,
    Claimed,
    Expired,
}

/// Database row for a food listing
#[derive(Debug, Clone, FromRow)]
pub struct FoodRow {
    pub food_id: Uuid,
    pub donor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: String,
    pub status: FoodStatus,
    pub expires_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
