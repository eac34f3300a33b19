//! HTTP API tests
//!
//! Each test drives the full router (authentication, role checks, handlers
//! and error mapping) over in-memory stores and a frozen clock.

use std::future::IntoFuture;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use chrono::Duration;
use serde_json::json;

use core_kernel::{ManualClock, UserId};
use domain_claims::ports::mock::MockClaimLedger;
use domain_claims::{Actor, ClaimStatus, Role};
use domain_food::ports::mock::MockFoodRegistry;
use domain_food::{FoodStatus, NewFood};
use interface_api::config::ApiConfig;
use interface_api::dto::claims::ClaimResponse;
use interface_api::dto::food::FoodResponse;
use interface_api::error::ErrorResponse;
use interface_api::handlers::health::{HealthResponse, ReadinessResponse};
use interface_api::{create_router, AppState};
use test_utils::{
    assert_single_approval_per_food, issue_token, ActorFixtures, LocationFixtures, NewFoodBuilder,
    TemporalFixtures,
};

const SECRET: &str = "api-test-secret";

struct Harness {
    server: TestServer,
    state: AppState,
    clock: Arc<ManualClock>,
    ledger: MockClaimLedger,
}

fn harness() -> Harness {
    let registry = MockFoodRegistry::new();
    let ledger = MockClaimLedger::new(&registry);
    let clock = Arc::new(TemporalFixtures::clock());
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    };
    let state = AppState::new(
        Arc::new(registry),
        Arc::new(ledger.clone()),
        clock.clone(),
        config,
    );
    let server = TestServer::new(create_router(state.clone())).unwrap();
    Harness {
        server,
        state,
        clock,
        ledger,
    }
}

fn bearer(actor: &Actor) -> String {
    issue_token(actor.id, actor.roles(), SECRET, 3600)
}

fn error_of(response: &TestResponse) -> ErrorResponse {
    response.json::<ErrorResponse>()
}

impl Harness {
    async fn post_food(&self, donor: &Actor) -> FoodResponse {
        self.post_details(donor, &NewFoodBuilder::new().build()).await
    }

    async fn post_details(&self, donor: &Actor, details: &NewFood) -> FoodResponse {
        let response = self
            .server
            .post("/api/v1/foods")
            .authorization_bearer(bearer(donor))
            .json(&json!({
                "foodName": details.name,
                "description": details.description,
                "quantity": details.quantity,
                "expiryTime": details.expires_at,
                "latitude": details.location.latitude,
                "longitude": details.location.longitude,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<FoodResponse>()
    }

    async fn claim(&self, receiver: &Actor, food: &FoodResponse) -> TestResponse {
        self.server
            .post("/api/v1/claims")
            .authorization_bearer(bearer(receiver))
            .json(&json!({ "foodId": food.id }))
            .await
    }

    async fn decide(&self, donor: &Actor, claim: &ClaimResponse, status: &str) -> TestResponse {
        self.server
            .patch(&format!("/api/v1/claims/{}/status", claim.id))
            .authorization_bearer(bearer(donor))
            .json(&json!({ "status": status }))
            .await
    }

    async fn mine(&self, receiver: &Actor) -> Vec<ClaimResponse> {
        let response = self
            .server
            .get("/api/v1/claims/mine")
            .authorization_bearer(bearer(receiver))
            .await;
        response.assert_status_ok();
        response.json::<Vec<ClaimResponse>>()
    }

    async fn food(&self, food: &FoodResponse) -> FoodResponse {
        let response = self
            .server
            .get(&format!("/api/v1/foods/{}", food.id))
            .authorization_bearer(bearer(&ActorFixtures::receiver()))
            .await;
        response.assert_status_ok();
        response.json::<FoodResponse>()
    }
}

#[tokio::test]
async fn test_claim_walkthrough() {
    let h = harness();
    let donor = ActorFixtures::donor();
    let (r1, r2, r3) = (
        ActorFixtures::receiver(),
        ActorFixtures::receiver(),
        ActorFixtures::receiver(),
    );
    let food = h.post_food(&donor).await;
    assert_eq!(food.status, FoodStatus::Available);

    let response = h.claim(&r1, &food).await;
    response.assert_status(StatusCode::CREATED);
    let c1 = response.json::<ClaimResponse>();
    assert_eq!(c1.status, ClaimStatus::Pending);
    assert_eq!(c1.receiver_id, r1.id);

    let response = h.claim(&r2, &food).await;
    response.assert_status(StatusCode::CREATED);
    let c2 = response.json::<ClaimResponse>();

    let response = h.decide(&donor, &c1, "Approved").await;
    response.assert_status_ok();
    let approved = response.json::<ClaimResponse>();
    assert_eq!(approved.status, ClaimStatus::Approved);
    assert!(approved.decided_at.is_some());
    assert_eq!(h.food(&food).await.status, FoodStatus::Claimed);

    let response = h.claim(&r3, &food).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let err = error_of(&response);
    assert_eq!(err.error, "invalid_state");
    assert_eq!(err.message, "food is not available");

    // The sibling claim is left pending
    let siblings = h.mine(&r2).await;
    assert_eq!(siblings[0].id, c2.id);
    assert_eq!(siblings[0].status, ClaimStatus::Pending);

    let response = h.decide(&donor, &c2, "Approved").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&response).message, "food is not available");

    h.decide(&donor, &c2, "Rejected").await.assert_status_ok();
    assert_eq!(h.ledger.len().await, 2);
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let h = harness();
        let response = h.server.get("/api/v1/claims/mine").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(&response).error, "unauthorized");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let h = harness();
        let token = issue_token(UserId::new(), &[Role::Receiver], "another-secret", 3600);

        let response = h
            .server
            .get("/api/v1/claims/mine")
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let h = harness();
        let token = issue_token(UserId::new(), &[Role::Receiver], SECRET, -3600);

        let response = h
            .server
            .get("/api/v1/claims/mine")
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(&response).error, "unauthorized");
    }

    #[tokio::test]
    async fn test_donor_cannot_submit_claims() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let food = h.post_food(&donor).await;

        let response = h.claim(&ActorFixtures::donor(), &food).await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(error_of(&response).error, "forbidden");
        assert!(h.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_receiver_cannot_post_food_or_decide() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let receiver = ActorFixtures::receiver();
        let food = h.post_food(&donor).await;
        let claim = h.claim(&receiver, &food).await.json::<ClaimResponse>();

        let response = h
            .server
            .post("/api/v1/foods")
            .authorization_bearer(bearer(&receiver))
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        h.decide(&receiver, &claim, "Approved")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

mod create_claim {
    use super::*;

    #[tokio::test]
    async fn test_missing_food_id() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/claims")
            .authorization_bearer(bearer(&ActorFixtures::receiver()))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err = error_of(&response);
        assert_eq!(err.error, "validation_error");
        assert_eq!(err.message, "foodId is required");
    }

    #[tokio::test]
    async fn test_unparseable_food_id() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/claims")
            .authorization_bearer(bearer(&ActorFixtures::receiver()))
            .json(&json!({ "foodId": "not-an-id" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).message, "invalid foodId");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/claims")
            .authorization_bearer(bearer(&ActorFixtures::receiver()))
            .text("{ foodId")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).error, "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_food() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/claims")
            .authorization_bearer(bearer(&ActorFixtures::receiver()))
            .json(&json!({ "foodId": core_kernel::FoodId::new() }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(error_of(&response).message, "food not found");
    }

    #[tokio::test]
    async fn test_self_claim_is_bad_request() {
        let h = harness();
        let both = ActorFixtures::donor_and_receiver();
        let food = h.post_food(&both).await;

        let response = h.claim(&both, &food).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err = error_of(&response);
        assert_eq!(err.error, "forbidden");
        assert_eq!(err.message, "donor cannot claim own food");
    }

    #[tokio::test]
    async fn test_duplicate_claim() {
        let h = harness();
        let receiver = ActorFixtures::receiver();
        let food = h.post_food(&ActorFixtures::donor()).await;
        h.claim(&receiver, &food).await.assert_status(StatusCode::CREATED);

        let response = h.claim(&receiver, &food).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err = error_of(&response);
        assert_eq!(err.error, "conflict");
        assert_eq!(err.message, "claim already submitted");
        assert_eq!(h.ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_food_cannot_be_claimed() {
        let h = harness();
        let food = h.post_food(&ActorFixtures::donor()).await;
        h.clock.advance(Duration::days(1));

        let expired = h.state.foods.expire_overdue().await.unwrap();
        assert_eq!(expired, vec![food.id]);
        assert_eq!(h.food(&food).await.status, FoodStatus::Expired);

        let response = h.claim(&ActorFixtures::receiver(), &food).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).message, "food is not available");
    }
}

mod update_status {
    use super::*;

    async fn pending_claim(h: &Harness, donor: &Actor) -> ClaimResponse {
        let food = h.post_food(donor).await;
        h.claim(&ActorFixtures::receiver(), &food)
            .await
            .json::<ClaimResponse>()
    }

    #[tokio::test]
    async fn test_reject_leaves_food_available() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let claim = pending_claim(&h, &donor).await;

        let response = h.decide(&donor, &claim, "Rejected").await;

        response.assert_status_ok();
        assert_eq!(response.json::<ClaimResponse>().status, ClaimStatus::Rejected);
        let food = h.state.foods.get(claim.food_id).await.unwrap();
        assert_eq!(food.status, FoodStatus::Available);
    }

    #[tokio::test]
    async fn test_other_donor_is_forbidden() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let claim = pending_claim(&h, &donor).await;

        let response = h.decide(&ActorFixtures::donor(), &claim, "Approved").await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(error_of(&response).message, "not authorized to update this claim");
        let food = h.state.foods.get(claim.food_id).await.unwrap();
        assert_eq!(food.status, FoodStatus::Available);
    }

    #[tokio::test]
    async fn test_invalid_and_missing_status() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let claim = pending_claim(&h, &donor).await;

        for status in ["Pending", "approved", "Cancelled"] {
            let response = h.decide(&donor, &claim, status).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(error_of(&response).message, "invalid status");
        }

        let response = h
            .server
            .patch(&format!("/api/v1/claims/{}/status", claim.id))
            .authorization_bearer(bearer(&donor))
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).message, "invalid status");
    }

    #[tokio::test]
    async fn test_unknown_claim() {
        let h = harness();
        let donor = ActorFixtures::donor();

        for id in [core_kernel::ClaimId::new().to_string(), "garbage".to_string()] {
            let response = h
                .server
                .patch(&format!("/api/v1/claims/{}/status", id))
                .authorization_bearer(bearer(&donor))
                .json(&json!({ "status": "Approved" }))
                .await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(error_of(&response).message, "claim not found");
        }
    }

    #[tokio::test]
    async fn test_decided_claim_is_final() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let claim = pending_claim(&h, &donor).await;
        h.decide(&donor, &claim, "Rejected").await.assert_status_ok();

        let response = h.decide(&donor, &claim, "Approved").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).message, "claim has already been decided");
        let food = h.state.foods.get(claim.food_id).await.unwrap();
        assert_eq!(food.status, FoodStatus::Available);
    }

    #[tokio::test]
    async fn test_racing_approvals_have_one_winner() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let food = h.post_food(&donor).await;
        let first = h.claim(&ActorFixtures::receiver(), &food).await.json::<ClaimResponse>();
        let second = h.claim(&ActorFixtures::receiver(), &food).await.json::<ClaimResponse>();

        let token = bearer(&donor);
        let approve = |claim: &ClaimResponse| {
            h.server
                .patch(&format!("/api/v1/claims/{}/status", claim.id))
                .authorization_bearer(token.clone())
                .json(&json!({ "status": "Approved" }))
                .into_future()
        };
        let (a, b) = tokio::join!(approve(&first), approve(&second));

        let mut statuses = vec![a.status_code(), b.status_code()];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);
        assert_eq!(h.food(&food).await.status, FoodStatus::Claimed);

        let mut all = h.state.engine.list_mine(first.receiver_id).await.unwrap();
        all.extend(h.state.engine.list_mine(second.receiver_id).await.unwrap());
        assert_single_approval_per_food(&all);
    }
}

mod list_mine {
    use super::*;

    #[tokio::test]
    async fn test_newest_first_with_food() {
        let h = harness();
        let donor = ActorFixtures::donor();
        let receiver = ActorFixtures::receiver();
        let older_food = h.post_food(&donor).await;
        let newer_food = h.post_food(&donor).await;

        let older = h.claim(&receiver, &older_food).await.json::<ClaimResponse>();
        h.clock.advance(Duration::minutes(10));
        let newer = h.claim(&receiver, &newer_food).await.json::<ClaimResponse>();
        h.claim(&ActorFixtures::receiver(), &older_food)
            .await
            .assert_status(StatusCode::CREATED);

        let mine = h.mine(&receiver).await;

        let ids: Vec<_> = mine.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        let embedded = mine[0].food.as_ref().unwrap();
        assert_eq!(embedded.id, newer_food.id);
        assert_eq!(embedded.food_name, newer_food.food_name);
    }

    #[tokio::test]
    async fn test_empty_for_new_receiver() {
        let h = harness();
        assert!(h.mine(&ActorFixtures::receiver()).await.is_empty());
    }

    #[tokio::test]
    async fn test_body_is_camel_case() {
        let h = harness();
        let receiver = ActorFixtures::receiver();
        let food = h.post_food(&ActorFixtures::donor()).await;
        h.claim(&receiver, &food).await;

        let body: serde_json::Value = h
            .server
            .get("/api/v1/claims/mine")
            .authorization_bearer(bearer(&receiver))
            .await
            .json();

        let claim = &body[0];
        assert_eq!(claim["status"], "Pending");
        assert!(claim.get("foodId").is_some());
        assert!(claim.get("claimedAt").is_some());
        assert!(claim.get("decidedAt").is_none());
        assert!(claim["food"]["location"].get("latitude").is_some());
    }
}

mod foods {
    use super::*;

    #[tokio::test]
    async fn test_post_and_get() {
        let h = harness();
        let donor = ActorFixtures::donor();

        let created = h.post_food(&donor).await;

        assert_eq!(created.donor_id, donor.id);
        assert_eq!(created.created_at, TemporalFixtures::start());
        let fetched = h.food(&created).await;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.quantity, created.quantity);
    }

    #[tokio::test]
    async fn test_text_is_trimmed_and_blank_description_dropped() {
        let h = harness();
        let details = NewFoodBuilder::new()
            .with_name("  Lentil soup ")
            .with_quantity(" 3 litres")
            .without_description()
            .at(LocationFixtures::community_kitchen())
            .build();

        let created = h.post_details(&ActorFixtures::donor(), &details).await;

        assert_eq!(created.food_name, "Lentil soup");
        assert_eq!(created.quantity, "3 litres");
        assert!(created.description.is_none());
        assert_eq!(created.location.latitude, LocationFixtures::community_kitchen().latitude);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/foods")
            .authorization_bearer(bearer(&ActorFixtures::donor()))
            .json(&json!({ "foodName": "Soup", "quantity": "4 bowls" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&response).message,
            "missing fields: expiryTime, latitude, longitude"
        );
    }

    #[tokio::test]
    async fn test_past_expiry_rejected() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/foods")
            .authorization_bearer(bearer(&ActorFixtures::donor()))
            .json(&json!({
                "foodName": "Soup",
                "quantity": "4 bowls",
                "expiryTime": TemporalFixtures::start() - Duration::hours(1),
                "latitude": 51.5,
                "longitude": -0.1,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response).message, "expiry time must be in the future");
    }

    #[tokio::test]
    async fn test_unknown_listing() {
        let h = harness();
        let token = bearer(&ActorFixtures::receiver());

        for id in [core_kernel::FoodId::new().to_string(), "nope".to_string()] {
            let response = h
                .server
                .get(&format!("/api/v1/foods/{}", id))
                .authorization_bearer(token.clone())
                .await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(error_of(&response).message, "food not found");
        }
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness_needs_no_token() {
        let h = harness();
        let response = h.server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<HealthResponse>().status, "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_both_stores() {
        let h = harness();
        let response = h.server.get("/health/ready").await;

        response.assert_status_ok();
        let body = response.json::<ReadinessResponse>();
        assert_eq!(body.status, "ready");
        assert_eq!(body.adapters.len(), 2);
        assert!(body.adapters.iter().all(|a| a.operational));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{decision_strategy, new_food_strategy, user_id_strategy};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_posted_listing_reads_back(details in new_food_strategy(TemporalFixtures::start())) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let h = harness();
                let created = h.post_details(&ActorFixtures::donor(), &details).await;
                let fetched = h.food(&created).await;

                assert_eq!(fetched.food_name, details.name.trim());
                assert_eq!(fetched.quantity, details.quantity.trim());
                assert_eq!(fetched.expiry_time, details.expires_at);
                assert_eq!(fetched.location.latitude, details.location.latitude);
                assert_eq!(fetched.location.longitude, details.location.longitude);
                assert_eq!(fetched.status, FoodStatus::Available);
            });
        }

        #[test]
        fn prop_only_the_owning_donor_decides(decision in decision_strategy(), stranger in user_id_strategy()) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let h = harness();
                let donor = ActorFixtures::donor();
                let food = h.post_food(&donor).await;
                let claim = h.claim(&ActorFixtures::receiver(), &food).await.json::<ClaimResponse>();
                let outsider = Actor::new(stranger, [Role::Donor]);

                h.decide(&outsider, &claim, decision.as_str())
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
                assert_eq!(h.food(&food).await.status, FoodStatus::Available);

                let response = h.decide(&donor, &claim, decision.as_str()).await;
                response.assert_status_ok();
                assert_eq!(response.json::<ClaimResponse>().status, decision);
            });
        }
    }
}
