//! HTTP API Layer
//!
//! REST API for the food-share claim service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, foods and health
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: camelCase request/response bodies
//! - **Error Handling**: Domain errors mapped to statuses with a
//!   `{ "error", "message" }` body
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(food_port, claim_port, Arc::new(SystemClock), config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::Clock;
use domain_claims::{ClaimLedgerPort, ClaimWorkflowEngine};
use domain_food::{FoodRegistry, FoodRegistryPort};

use crate::config::ApiConfig;
use crate::handlers::{claims, food, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: ClaimWorkflowEngine,
    pub foods: FoodRegistry,
    pub food_port: Arc<dyn FoodRegistryPort>,
    pub claim_port: Arc<dyn ClaimLedgerPort>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the services over the given stores
    pub fn new(
        food_port: Arc<dyn FoodRegistryPort>,
        claim_port: Arc<dyn ClaimLedgerPort>,
        clock: Arc<dyn Clock>,
        config: ApiConfig,
    ) -> Self {
        Self {
            engine: ClaimWorkflowEngine::new(food_port.clone(), claim_port.clone(), clock.clone()),
            foods: FoodRegistry::new(food_port.clone(), clock),
            food_port,
            claim_port,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim))
        .route("/mine", get(claims::list_my_claims))
        .route("/:id/status", patch(claims::update_claim_status));

    let food_routes = Router::new()
        .route("/", post(food::create_food))
        .route("/:id", get(food::get_food));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/foods", food_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
