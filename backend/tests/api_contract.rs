//! Contract-level checks: authentication, error envelopes, correlation
//! headers, and the published OpenAPI document.

#![allow(clippy::expect_used)]

mod common;

use actix_web::{App, test, web};
use backend::middleware::RequestCorrelation;
use backend::server::{self, AppState};
use serde_json::{Value, json};
use uuid::Uuid;

use common::{create_slot, field, get, post_json, signup};

macro_rules! spawn_app {
    () => {
        test::init_service(
            App::new()
                .wrap(RequestCorrelation)
                .configure(server::configure(web::Data::new(AppState::in_memory()))),
        )
        .await
    };
}

#[actix_web::test]
async fn protected_routes_require_a_bearer_token() {
    let app = spawn_app!();
    for path in ["/api/events", "/api/swappable-slots", "/api/swap-requests"] {
        let res = get(&app, path, None).await;
        assert_eq!(res.status(), 401, "{path} must require auth");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(field(&body, "code"), "auth_required");
    }

    let res = get(&app, "/api/events", Some("bogus-token")).await;
    assert_eq!(res.status(), 401);
}

#[actix_web::test]
async fn login_round_trips_and_rejects_bad_credentials() {
    let app = spawn_app!();
    signup(&app, "Alice", "alice@example.com").await;

    let res = post_json(
        &app,
        "/api/login",
        None,
        json!({ "email": "alice@example.com", "password": "hunter2" }),
    )
    .await;
    assert_eq!(res.status(), 200);
    let session: Value = test::read_body_json(res).await;
    assert_eq!(field(&session, "email"), "alice@example.com");

    // The fresh token works against a protected route.
    let res = get(&app, "/api/events", Some(field(&session, "token"))).await;
    assert_eq!(res.status(), 200);

    let res = post_json(
        &app,
        "/api/login",
        None,
        json!({ "email": "alice@example.com", "password": "wrong" }),
    )
    .await;
    assert_eq!(res.status(), 401);
}

#[actix_web::test]
async fn logout_invalidates_the_token() {
    let app = spawn_app!();
    let alice = signup(&app, "Alice", "alice@example.com").await;
    let token = field(&alice, "token");

    let res = post_json(&app, "/api/logout", Some(token), json!({})).await;
    assert_eq!(res.status(), 204);

    let res = get(&app, "/api/events", Some(token)).await;
    assert_eq!(res.status(), 401);
}

#[actix_web::test]
async fn duplicate_signup_conflicts() {
    let app = spawn_app!();
    signup(&app, "Alice", "alice@example.com").await;

    let res = post_json(
        &app,
        "/api/signup",
        None,
        json!({ "name": "Clone", "email": "alice@example.com", "password": "other" }),
    )
    .await;
    assert_eq!(res.status(), 409);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(field(&body, "code"), "email_taken");
}

#[actix_web::test]
async fn error_envelope_carries_the_request_id() {
    let app = spawn_app!();
    let alice = signup(&app, "Alice", "alice@example.com").await;

    let res = get(&app, "/api/events", Some(field(&alice, "token"))).await;
    assert!(res.headers().contains_key("x-request-id"));

    // A 404 envelope echoes the same id the header carries.
    let missing = Uuid::new_v4();
    let res = post_json(
        &app,
        "/api/swap-response",
        Some(field(&alice, "token")),
        json!({ "requestId": missing, "accepted": true }),
    )
    .await;
    assert_eq!(res.status(), 404);
    let header_id = res
        .headers()
        .get("x-request-id")
        .expect("correlation header")
        .to_str()
        .expect("ascii header")
        .to_owned();
    let body: Value = test::read_body_json(res).await;
    assert_eq!(field(&body, "code"), "request_not_found");
    assert_eq!(field(&body, "requestId"), header_id);
    assert_eq!(body["details"]["requestId"], json!(missing));
}

#[actix_web::test]
async fn malformed_event_payloads_are_rejected() {
    let app = spawn_app!();
    let alice = signup(&app, "Alice", "alice@example.com").await;
    let token = field(&alice, "token");

    // Blank title.
    let res = post_json(
        &app,
        "/api/events",
        Some(token),
        json!({
            "title": "   ",
            "startTime": "2026-09-01T09:00:00Z",
            "endTime": "2026-09-01T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(field(&body, "code"), "invalid_request");

    // Interval runs backwards.
    let res = post_json(
        &app,
        "/api/events",
        Some(token),
        json!({
            "title": "Focus Block",
            "startTime": "2026-09-01T10:00:00Z",
            "endTime": "2026-09-01T09:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 400);

    // Status defaults to BUSY when omitted.
    let res = post_json(
        &app,
        "/api/events",
        Some(token),
        json!({
            "title": "Focus Block",
            "startTime": "2026-09-01T09:00:00Z",
            "endTime": "2026-09-01T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);
    let slot: Value = test::read_body_json(res).await;
    assert_eq!(field(&slot, "status"), "BUSY");
}

#[actix_web::test]
async fn status_updates_enforce_ownership() {
    let app = spawn_app!();
    let alice = signup(&app, "Alice", "alice@example.com").await;
    let bob = signup(&app, "Bob", "bob@example.com").await;
    let slot = create_slot(&app, field(&alice, "token"), "Focus Block", "BUSY").await;

    let res = common::put_json(
        &app,
        &format!("/api/events/{}/status", field(&slot, "id")),
        field(&bob, "token"),
        json!({ "status": "SWAPPABLE" }),
    )
    .await;
    assert_eq!(res.status(), 403);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(field(&body, "code"), "not_owner");

    // The owner's toggle succeeds and is reflected on the wire.
    let res = common::put_json(
        &app,
        &format!("/api/events/{}/status", field(&slot, "id")),
        field(&alice, "token"),
        json!({ "status": "SWAPPABLE" }),
    )
    .await;
    assert_eq!(res.status(), 200);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(field(&updated, "status"), "SWAPPABLE");
}

#[actix_web::test]
async fn unknown_slot_ids_yield_not_found() {
    let app = spawn_app!();
    let alice = signup(&app, "Alice", "alice@example.com").await;
    let token = field(&alice, "token");
    let mine = create_slot(&app, token, "Focus Block", "SWAPPABLE").await;

    let res = post_json(
        &app,
        "/api/swap-request",
        Some(token),
        json!({
            "mySlotId": field(&mine, "id"),
            "desiredSlotId": Uuid::new_v4(),
        }),
    )
    .await;
    assert_eq!(res.status(), 404);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(field(&body, "code"), "slot_not_found");
}

#[actix_web::test]
async fn openapi_document_is_served() {
    let app = spawn_app!();
    let res = get(&app, "/api-docs/openapi.json", None).await;
    assert_eq!(res.status(), 200);
    let doc: Value = test::read_body_json(res).await;
    assert!(doc["paths"]["/api/swap-request"].is_object());
    assert!(doc["components"]["schemas"]["Slot"].is_object());
}
