//! Claims handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{ClaimId, FoodId};
use domain_claims::{Actor, ClaimError, ClaimStatus, Role};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Submits a claim on a listing
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateClaimRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    actor.require_role(Role::Receiver)?;
    let Json(request) = body?;

    let raw = request
        .food_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ClaimError::MissingFoodId)?;
    let food_id: FoodId = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::validation("invalid foodId"))?;

    let claim = state.engine.create(food_id, actor.id).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// Approves or rejects a claim
pub async fn update_claim_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateClaimStatusRequest>, JsonRejection>,
) -> Result<Json<ClaimResponse>, ApiError> {
    actor.require_role(Role::Donor)?;
    let Json(request) = body?;

    let status: ClaimStatus = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()?;
    let claim_id: ClaimId = id
        .parse()
        .map_err(|_| ApiError::NotFound("claim not found".to_string()))?;

    let claim = state.engine.update_status(claim_id, actor.id, status).await?;
    Ok(Json(claim.into()))
}

/// Lists the caller's claims, newest first
pub async fn list_my_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    actor.require_role(Role::Receiver)?;

    let claims = state.engine.list_mine(actor.id).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}
