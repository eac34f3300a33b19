//! Food registry service
//!
//! Wraps a `FoodRegistryPort` with the domain rules for posting listings and
//! running the expiry sweep.

use std::sync::Arc;
use tracing::{debug, info};

use core_kernel::{Clock, FoodId, PortError, UserId};

use crate::error::FoodError;
use crate::food::{Food, NewFood};
use crate::ports::FoodRegistryPort;

/// Application service for food listings
#[derive(Clone)]
pub struct FoodRegistry {
    port: Arc<dyn FoodRegistryPort>,
    clock: Arc<dyn Clock>,
}

impl FoodRegistry {
    pub fn new(port: Arc<dyn FoodRegistryPort>, clock: Arc<dyn Clock>) -> Self {
        Self { port, clock }
    }

    /// Posts a new listing on behalf of `donor_id`
    pub async fn register(&self, donor_id: UserId, details: NewFood) -> Result<Food, FoodError> {
        let food = Food::register(donor_id, details, self.clock.now())?;
        let stored = self.port.insert_food(&food).await?;
        info!(food_id = %stored.id, donor_id = %donor_id, "food listing registered");
        Ok(stored)
    }

    /// Looks a listing up by ID
    pub async fn get(&self, id: FoodId) -> Result<Food, FoodError> {
        self.port.get_food(id).await.map_err(|e| match e {
            PortError::NotFound { .. } => FoodError::NotFound(id),
            other => FoodError::from(other),
        })
    }

    /// Expires every available listing whose expiry has passed
    ///
    /// Intended to be driven by an external scheduler.
    pub async fn expire_overdue(&self) -> Result<Vec<FoodId>, FoodError> {
        let now = self.clock.now();
        let expired = self.port.expire_overdue(now).await?;
        if expired.is_empty() {
            debug!("no overdue food listings");
        } else {
            info!(count = expired.len(), "expired overdue food listings");
        }
        Ok(expired)
    }
}

impl std::fmt::Debug for FoodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodRegistry").field("clock", &self.clock).finish_non_exhaustive()
    }
}
