//! Food handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::FoodId;
use domain_claims::{Actor, Role};

use crate::dto::food::*;
use crate::{error::ApiError, AppState};

/// Posts a new listing
pub async fn create_food(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateFoodRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FoodResponse>), ApiError> {
    actor.require_role(Role::Donor)?;
    let Json(request) = body?;

    let food = state.foods.register(actor.id, request.into_new_food()?).await?;
    Ok((StatusCode::CREATED, Json(food.into())))
}

/// Gets a listing by ID
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FoodResponse>, ApiError> {
    let food_id: FoodId = id
        .parse()
        .map_err(|_| ApiError::NotFound("food not found".to_string()))?;

    let food = state.foods.get(food_id).await?;
    Ok(Json(food.into()))
}
