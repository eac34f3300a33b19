//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests set only the fields they care about; free-text fields are filled
//! with fake data.

use chrono::{DateTime, Utc};
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;

use core_kernel::{FoodId, UserId};
use domain_claims::{Claim, ClaimStatus};
use domain_food::{Food, FoodStatus, GeoLocation, NewFood};

use crate::fixtures::{LocationFixtures, TemporalFixtures};

/// Builder for listing details submitted at registration
pub struct NewFoodBuilder {
    name: String,
    description: Option<String>,
    quantity: String,
    expires_at: DateTime<Utc>,
    location: GeoLocation,
}

impl Default for NewFoodBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewFoodBuilder {
    pub fn new() -> Self {
        let word: String = Word().fake();
        let portions: u8 = (1..40).fake();
        Self {
            name: format!("{} tray", word),
            description: Some(Sentence(3..8).fake()),
            quantity: format!("{} portions", portions),
            expires_at: TemporalFixtures::evening_expiry(),
            location: LocationFixtures::community_kitchen(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn at(mut self, location: GeoLocation) -> Self {
        self.location = location;
        self
    }

    pub fn build(self) -> NewFood {
        NewFood {
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            expires_at: self.expires_at,
            location: self.location,
        }
    }
}

/// Builder for stored listings in any status
pub struct FoodBuilder {
    donor_id: UserId,
    details: NewFoodBuilder,
    status: FoodStatus,
    created_at: DateTime<Utc>,
}

impl Default for FoodBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodBuilder {
    pub fn new() -> Self {
        Self {
            donor_id: UserId::new(),
            details: NewFoodBuilder::new(),
            status: FoodStatus::Available,
            created_at: TemporalFixtures::start(),
        }
    }

    pub fn donated_by(mut self, donor_id: UserId) -> Self {
        self.donor_id = donor_id;
        self
    }

    pub fn with_details(mut self, details: NewFoodBuilder) -> Self {
        self.details = details;
        self
    }

    pub fn with_status(mut self, status: FoodStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds the listing, bypassing registration checks
    pub fn build(self) -> Food {
        let details = self.details.build();
        Food {
            id: FoodId::new_v7(),
            donor_id: self.donor_id,
            name: details.name,
            description: details.description,
            quantity: details.quantity,
            status: self.status,
            expires_at: details.expires_at,
            location: details.location,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Builder for claims in any status
pub struct ClaimBuilder {
    food_id: FoodId,
    receiver_id: UserId,
    status: ClaimStatus,
    created_at: DateTime<Utc>,
}

impl ClaimBuilder {
    /// Starts a pending claim against `food_id`
    pub fn for_food(food_id: FoodId) -> Self {
        Self {
            food_id,
            receiver_id: UserId::new(),
            status: ClaimStatus::Pending,
            created_at: TemporalFixtures::start(),
        }
    }

    pub fn by(mut self, receiver_id: UserId) -> Self {
        self.receiver_id = receiver_id;
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> Claim {
        let mut claim = Claim::submit(self.food_id, self.receiver_id, self.created_at);
        if self.status.is_decision() {
            claim.status = self.status;
            claim.decided_at = Some(self.created_at);
        }
        claim
    }
}
