//! Food Registry Ports
//!
//! The `FoodRegistryPort` trait is everything the rest of the system needs
//! from wherever food listings are stored. Two implementations exist:
//!
//! - **Internal Adapter**: PostgreSQL via `infra_db`
//! - **Mock Adapter**: in-memory, behind the `mock` feature, for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_food::ports::FoodRegistryPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn FoodRegistryPort> = Arc::new(PostgresFoodAdapter::new(pool));
//! let food = port.get_food(food_id).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, FoodId, HealthCheckable, PortError};

use crate::food::Food;

/// The port trait for food listing storage
///
/// Status changes are expressed as conditional writes: the store applies them
/// only if the listing is still `Available` at the moment of the write, and
/// reports whether it did.
#[async_trait]
pub trait FoodRegistryPort: DomainPort + HealthCheckable {
    /// Persists a newly registered listing
    async fn insert_food(&self, food: &Food) -> Result<Food, PortError>;

    /// Retrieves a listing by ID, or `PortError::NotFound`
    async fn get_food(&self, id: FoodId) -> Result<Food, PortError>;

    /// Sets the listing to Claimed if and only if it is still Available
    ///
    /// # Returns
    ///
    /// `true` if this call performed the transition, `false` if the listing
    /// was already Claimed or Expired
    async fn mark_claimed(&self, id: FoodId, at: DateTime<Utc>) -> Result<bool, PortError>;

    /// Expires every Available listing whose expiry is at or before `now`
    ///
    /// # Returns
    ///
    /// The IDs of the listings that were expired by this call
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<FoodId>, PortError>;
}

/// Mock implementation of FoodRegistryPort for testing
///
/// This adapter stores listings in memory and is useful for unit testing
/// without a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Shared map of listings; other in-memory adapters lock it to make
    /// multi-entity writes atomic
    pub type FoodTable = Arc<RwLock<HashMap<FoodId, Food>>>;

    /// In-memory mock implementation of FoodRegistryPort
    #[derive(Debug, Default, Clone)]
    pub struct MockFoodRegistry {
        foods: FoodTable,
    }

    impl MockFoodRegistry {
        /// Creates a new empty registry
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with listings for testing
        pub async fn with_foods(foods: Vec<Food>) -> Self {
            let port = Self::new();
            {
                let mut table = port.foods.write().await;
                for food in foods {
                    table.insert(food.id, food);
                }
            }
            port
        }

        /// Handle to the underlying table
        pub fn table(&self) -> FoodTable {
            Arc::clone(&self.foods)
        }
    }

    impl DomainPort for MockFoodRegistry {}

    #[async_trait]
    impl HealthCheckable for MockFoodRegistry {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-food-registry".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl FoodRegistryPort for MockFoodRegistry {
        async fn insert_food(&self, food: &Food) -> Result<Food, PortError> {
            let mut foods = self.foods.write().await;
            if foods.contains_key(&food.id) {
                return Err(PortError::conflict(format!("food {} already exists", food.id)));
            }
            foods.insert(food.id, food.clone());
            Ok(food.clone())
        }

        async fn get_food(&self, id: FoodId) -> Result<Food, PortError> {
            self.foods
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Food", id))
        }

        async fn mark_claimed(&self, id: FoodId, at: DateTime<Utc>) -> Result<bool, PortError> {
            let mut foods = self.foods.write().await;
            let food = foods
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Food", id))?;
            Ok(food.mark_claimed(at).is_ok())
        }

        async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<FoodId>, PortError> {
            let mut foods = self.foods.write().await;
            let mut expired: Vec<FoodId> = foods
                .values_mut()
                .filter(|f| f.is_available() && f.is_past_expiry(now))
                .filter_map(|f| f.expire(now).ok().map(|_| f.id))
                .collect();
            expired.sort();
            Ok(expired)
        }
    }
}
