//! Food aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{FoodId, UserId};
use crate::error::FoodError;

/// Availability status of a food listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodStatus {
    /// Open for claims
    Available,
    /// A claim against it was approved
    Claimed,
    /// Its expiry time passed while still available
    Expired,
}

impl FoodStatus {
    /// Returns the canonical name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodStatus::Available => "Available",
            FoodStatus::Claimed => "Claimed",
            FoodStatus::Expired => "Expired",
        }
    }

    /// Claimed and Expired listings never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FoodStatus::Available)
    }
}

impl fmt::Display for FoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodStatus {
    type Err = FoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(FoodStatus::Available),
            "Claimed" => Ok(FoodStatus::Claimed),
            "Expired" => Ok(FoodStatus::Expired),
            other => Err(FoodError::Validation(format!("unknown food status '{}'", other))),
        }
    }
}

/// Pickup location of a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoLocation {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Details a donor supplies when posting food
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFood {
    /// What is being given away
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Free-form notes (allergens, packaging, pickup hints)
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Amount on offer, as the donor describes it ("3 trays", "5 kg")
    #[validate(length(min = 1, max = 100))]
    pub quantity: String,
    /// After this instant the listing may no longer be claimed
    pub expires_at: DateTime<Utc>,
    /// Where the food can be collected
    pub location: GeoLocation,
}

/// A surplus food listing posted by a donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Unique identifier
    pub id: FoodId,
    /// Donor who posted the listing
    pub donor_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: String,
    /// Availability status
    pub status: FoodStatus,
    pub expires_at: DateTime<Utc>,
    pub location: GeoLocation,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Food {
    /// Creates a new available listing owned by `donor_id`
    ///
    /// # Errors
    ///
    /// Returns `FoodError::Validation` when a field is empty or out of range,
    /// or when the expiry is not strictly after `now`.
    pub fn register(donor_id: UserId, details: NewFood, now: DateTime<Utc>) -> Result<Self, FoodError> {
        let mut invalid: Vec<String> = Vec::new();
        if let Err(errors) = details.validate() {
            invalid.extend(errors.field_errors().keys().map(|k| k.to_string()));
        }
        if let Err(errors) = details.location.validate() {
            invalid.extend(errors.field_errors().keys().map(|k| k.to_string()));
        }
        if details.name.trim().is_empty() && !invalid.iter().any(|f| f == "name") {
            invalid.push("name".to_string());
        }
        if details.quantity.trim().is_empty() && !invalid.iter().any(|f| f == "quantity") {
            invalid.push("quantity".to_string());
        }
        if !invalid.is_empty() {
            invalid.sort();
            return Err(FoodError::Validation(format!("invalid fields: {}", invalid.join(", "))));
        }
        if details.expires_at <= now {
            return Err(FoodError::Validation("expiry time must be in the future".to_string()));
        }

        Ok(Self {
            id: FoodId::new_v7(),
            donor_id,
            name: details.name.trim().to_string(),
            description: details.description,
            quantity: details.quantity.trim().to_string(),
            status: FoodStatus::Available,
            expires_at: details.expires_at,
            location: details.location,
            created_at: now,
            updated_at: now,
        })
    }

    /// True while receivers may still claim the listing
    pub fn is_available(&self) -> bool {
        self.status == FoodStatus::Available
    }

    /// True if `user_id` posted this listing
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.donor_id == user_id
    }

    /// True if the expiry instant has been reached
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Marks the listing claimed after an approval
    pub fn mark_claimed(&mut self, at: DateTime<Utc>) -> Result<(), FoodError> {
        self.transition(FoodStatus::Claimed, at)
    }

    /// Marks the listing expired
    pub fn expire(&mut self, at: DateTime<Utc>) -> Result<(), FoodError> {
        self.transition(FoodStatus::Expired, at)
    }

    fn transition(&mut self, target: FoodStatus, at: DateTime<Utc>) -> Result<(), FoodError> {
        if !self.can_transition_to(target) {
            return Err(FoodError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = at;
        Ok(())
    }

    fn can_transition_to(&self, target: FoodStatus) -> bool {
        use FoodStatus::*;
        matches!((self.status, target), (Available, Claimed) | (Available, Expired))
    }
}
