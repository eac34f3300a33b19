//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, FoodId, UserId};
use domain_claims::{Claim, ClaimStatus, ClaimWithFood};

use crate::dto::food::FoodResponse;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub food_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateClaimStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub food_id: FoodId,
    pub receiver_id: UserId,
    pub status: ClaimStatus,
    pub claimed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<FoodResponse>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id,
            food_id: claim.food_id,
            receiver_id: claim.receiver_id,
            status: claim.status,
            claimed_at: claim.created_at,
            decided_at: claim.decided_at,
            food: None,
        }
    }
}

impl From<ClaimWithFood> for ClaimResponse {
    fn from(joined: ClaimWithFood) -> Self {
        Self {
            food: Some(joined.food.into()),
            ..Self::from(joined.claim)
        }
    }
}
