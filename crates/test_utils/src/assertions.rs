//! Custom Test Assertions
//!
//! Assertion helpers for claims and listings that give more meaningful
//! failure messages than bare `assert_eq!`.

use domain_claims::{Claim, ClaimStatus, ClaimWithFood};
use domain_food::{Food, FoodStatus};

/// Asserts a claim's status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} has status {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts a listing's status
pub fn assert_food_status(food: &Food, expected: FoodStatus) {
    assert_eq!(
        food.status, expected,
        "Food {} has status {}, expected {}",
        food.id, food.status, expected
    );
}

/// Asserts that claims are ordered newest first
pub fn assert_newest_first(claims: &[ClaimWithFood]) {
    for pair in claims.windows(2) {
        assert!(
            pair[0].claim.created_at >= pair[1].claim.created_at,
            "Claims out of order: {} ({}) listed before {} ({})",
            pair[0].claim.id,
            pair[0].claim.created_at,
            pair[1].claim.id,
            pair[1].claim.created_at
        );
    }
}

/// Asserts that at most one claim per listing is Approved
pub fn assert_single_approval_per_food(claims: &[ClaimWithFood]) {
    let mut approved: Vec<_> = claims
        .iter()
        .filter(|c| c.claim.status == ClaimStatus::Approved)
        .map(|c| c.food.id)
        .collect();
    let total = approved.len();
    approved.sort();
    approved.dedup();
    assert_eq!(
        approved.len(),
        total,
        "A listing has more than one approved claim"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{ClaimBuilder, FoodBuilder};
    use chrono::Duration;
    use crate::fixtures::TemporalFixtures;

    fn joined(food: &Food, offset_minutes: i64, status: ClaimStatus) -> ClaimWithFood {
        ClaimWithFood {
            claim: ClaimBuilder::for_food(food.id)
                .with_status(status)
                .created_at(TemporalFixtures::start() + Duration::minutes(offset_minutes))
                .build(),
            food: food.clone(),
        }
    }

    #[test]
    fn test_newest_first_accepts_sorted() {
        let food = FoodBuilder::new().build();
        let claims = vec![
            joined(&food, 2, ClaimStatus::Pending),
            joined(&food, 1, ClaimStatus::Pending),
        ];
        assert_newest_first(&claims);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_newest_first_rejects_unsorted() {
        let food = FoodBuilder::new().build();
        let claims = vec![
            joined(&food, 1, ClaimStatus::Pending),
            joined(&food, 2, ClaimStatus::Pending),
        ];
        assert_newest_first(&claims);
    }

    #[test]
    #[should_panic(expected = "more than one approved")]
    fn test_double_approval_detected() {
        let food = FoodBuilder::new().build();
        let claims = vec![
            joined(&food, 1, ClaimStatus::Approved),
            joined(&food, 2, ClaimStatus::Approved),
        ];
        assert_single_approval_per_food(&claims);
    }
}
