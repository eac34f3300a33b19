//! Food DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{FoodId, UserId};
use domain_food::{Food, FoodStatus, GeoLocation, NewFood};

use crate::error::ApiError;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    #[serde(default)]
    pub food_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: String,
    pub expiry_time: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CreateFoodRequest {
    /// Converts to registration details
    ///
    /// Only presence is checked here; the registry validates values.
    pub fn into_new_food(self) -> Result<NewFood, ApiError> {
        let mut missing = Vec::new();
        if self.expiry_time.is_none() {
            missing.push("expiryTime");
        }
        if self.latitude.is_none() {
            missing.push("latitude");
        }
        if self.longitude.is_none() {
            missing.push("longitude");
        }
        match (self.expiry_time, self.latitude, self.longitude) {
            (Some(expires_at), Some(latitude), Some(longitude)) => Ok(NewFood {
                name: self.food_name,
                description: self.description.filter(|d| !d.trim().is_empty()),
                quantity: self.quantity,
                expires_at,
                location: GeoLocation::new(latitude, longitude),
            }),
            _ => Err(ApiError::validation(format!("missing fields: {}", missing.join(", ")))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodResponse {
    pub id: FoodId,
    pub donor_id: UserId,
    pub food_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: String,
    pub status: FoodStatus,
    pub expiry_time: DateTime<Utc>,
    pub location: LocationResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Food> for FoodResponse {
    fn from(food: Food) -> Self {
        Self {
            id: food.id,
            donor_id: food.donor_id,
            food_name: food.name,
            description: food.description,
            quantity: food.quantity,
            status: food.status,
            expiry_time: food.expires_at,
            location: LocationResponse {
                latitude: food.location.latitude,
                longitude: food.location.longitude,
            },
            created_at: food.created_at,
        }
    }
}
