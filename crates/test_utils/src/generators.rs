//! Property-Based Test Generators
//!
//! Proptest strategies for generating listings and statuses that respect
//! the registration rules.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use core_kernel::UserId;
use domain_claims::ClaimStatus;
use domain_food::{FoodStatus, GeoLocation, NewFood};

/// Food statuses that block new claims
pub fn unavailable_food_status_strategy() -> impl Strategy<Value = FoodStatus> {
    prop_oneof![Just(FoodStatus::Claimed), Just(FoodStatus::Expired)]
}

/// Statuses a donor may set
pub fn decision_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![Just(ClaimStatus::Approved), Just(ClaimStatus::Rejected)]
}

/// Valid coordinates
pub fn location_strategy() -> impl Strategy<Value = GeoLocation> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| GeoLocation::new(lat, lng))
}

/// Registration details that are valid relative to `now`
pub fn new_food_strategy(now: DateTime<Utc>) -> impl Strategy<Value = NewFood> {
    (
        "[A-Za-z][A-Za-z ]{0,40}",
        proptest::option::of("[a-z ]{0,120}"),
        "[1-9][0-9]{0,2} (kg|portions|boxes)",
        1i64..(7 * 24 * 60),
        location_strategy(),
    )
        .prop_map(move |(name, description, quantity, minutes, location)| NewFood {
            name,
            description,
            quantity,
            expires_at: now + Duration::minutes(minutes),
            location,
        })
}

/// Random user ids
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|bits| UserId::from(uuid::Uuid::from_u128(bits)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_food::Food;

    proptest! {
        #[test]
        fn prop_generated_details_register(details in new_food_strategy(Utc::now()), donor in user_id_strategy()) {
            let registered = Food::register(donor, details, Utc::now() - Duration::seconds(1));
            prop_assert!(registered.is_ok());
        }

        #[test]
        fn prop_unavailable_statuses_are_not_available(status in unavailable_food_status_strategy()) {
            prop_assert_ne!(status, FoodStatus::Available);
        }
    }
}
