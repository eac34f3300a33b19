//! PostgreSQL Food Registry Adapter
//!
//! Implements `FoodRegistryPort` on top of [`FoodRepository`], translating
//! between domain listings and database rows.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresFoodRegistry;
//! use domain_food::FoodRegistryPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn FoodRegistryPort> = Arc::new(PostgresFoodRegistry::new(pool));
//! let food = port.get_food(food_id).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, FoodId, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_food::{Food, FoodRegistryPort, FoodStatus, GeoLocation};

use crate::adapters::ping;
use crate::error::to_port_error;
use crate::repositories::food::{FoodRepository, FoodRow, FoodStatus as DbFoodStatus};

/// PostgreSQL-backed implementation of the FoodRegistryPort trait
#[derive(Debug, Clone)]
pub struct PostgresFoodRegistry {
    repository: FoodRepository,
    pool: PgPool,
}

impl PostgresFoodRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FoodRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &FoodRepository {
        &self.repository
    }
}

impl DomainPort for PostgresFoodRegistry {}

#[async_trait]
impl HealthCheckable for PostgresFoodRegistry {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-food-registry").await
    }
}

#[async_trait]
impl FoodRegistryPort for PostgresFoodRegistry {
    #[instrument(skip(self, food), fields(food_id = %food.id))]
    async fn insert_food(&self, food: &Food) -> Result<Food, PortError> {
        debug!("Inserting food listing");
        let row = self
            .repository
            .insert(&food_to_row(food))
            .await
            .map_err(|e| to_port_error(e, "Food", food.id))?;
        Ok(row_to_food(row))
    }

    #[instrument(skip(self), fields(food_id = %id))]
    async fn get_food(&self, id: FoodId) -> Result<Food, PortError> {
        let row = self
            .repository
            .get_by_id(id.into())
            .await
            .map_err(|e| to_port_error(e, "Food", id))?;
        Ok(row_to_food(row))
    }

    #[instrument(skip(self), fields(food_id = %id))]
    async fn mark_claimed(&self, id: FoodId, at: DateTime<Utc>) -> Result<bool, PortError> {
        self.repository
            .mark_claimed(id.into(), at)
            .await
            .map_err(|e| to_port_error(e, "Food", id))
    }

    #[instrument(skip(self))]
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<FoodId>, PortError> {
        let ids = self
            .repository
            .expire_overdue(now)
            .await
            .map_err(|e| to_port_error(e, "Food", "overdue"))?;
        debug!(count = ids.len(), "Expired overdue listings");
        Ok(ids.into_iter().map(FoodId::from).collect())
    }
}

pub(crate) fn status_to_db(status: FoodStatus) -> DbFoodStatus {
    match status {
        FoodStatus::Available => DbFoodStatus::Available,
        FoodStatus::Claimed => DbFoodStatus::Claimed,
        FoodStatus::Expired => DbFoodStatus::Expired,
    }
}

pub(crate) fn status_from_db(status: DbFoodStatus) -> FoodStatus {
    match status {
        DbFoodStatus::Available => FoodStatus::Available,
        DbFoodStatus::Claimed => FoodStatus::Claimed,
        DbFoodStatus::Expired => FoodStatus::Expired,
    }
}

fn food_to_row(food: &Food) -> FoodRow {
    FoodRow {
        food_id: food.id.into(),
        donor_id: food.donor_id.into(),
        name: food.name.clone(),
        description: food.description.clone(),
        quantity: food.quantity.clone(),
        status: status_to_db(food.status),
        expires_at: food.expires_at,
        latitude: food.location.latitude,
        longitude: food.location.longitude,
        created_at: food.created_at,
        updated_at: food.updated_at,
    }
}

pub(crate) fn row_to_food(row: FoodRow) -> Food {
    Food {
        id: FoodId::from(row.food_id),
        donor_id: UserId::from(row.donor_id),
        name: row.name,
        description: row.description,
        quantity: row.quantity,
        status: status_from_db(row.status),
        expires_at: row.expires_at,
        location: GeoLocation::new(row.latitude, row.longitude),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain_food::NewFood;

    #[test]
    fn test_row_mapping_preserves_listing() {
        let now = Utc::now();
        let food = Food::register(
            UserId::new(),
            NewFood {
                name: "Apples".to_string(),
                description: None,
                quantity: "1 crate".to_string(),
                expires_at: now + Duration::days(2),
                location: GeoLocation::new(35.6762, 139.6503),
            },
            now,
        )
        .unwrap();

        assert_eq!(row_to_food(food_to_row(&food)), food);
    }

    #[test]
    fn test_status_mapping_is_total() {
        for status in [FoodStatus::Available, FoodStatus::Claimed, FoodStatus::Expired] {
            assert_eq!(status_from_db(status_to_db(status)), status);
        }
    }
}
