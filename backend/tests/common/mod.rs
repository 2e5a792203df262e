//! Shared helpers for the HTTP integration tests.

#![allow(dead_code, clippy::expect_used)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{Error, test};
use serde_json::{Value, json};

/// `POST` a JSON body, optionally with a bearer token.
pub async fn post_json<S, B>(
    app: &S,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post().uri(path).set_json(body);
    if let Some(token) = token {
        req = req.insert_header(("authorization", format!("Bearer {token}")));
    }
    test::call_service(app, req.to_request()).await
}

/// `PUT` a JSON body with a bearer token.
pub async fn put_json<S, B>(app: &S, path: &str, token: &str, body: Value) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::put()
        .uri(path)
        .insert_header(("authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

/// `GET` a path, optionally with a bearer token.
pub async fn get<S, B>(app: &S, path: &str, token: Option<&str>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::get().uri(path);
    if let Some(token) = token {
        req = req.insert_header(("authorization", format!("Bearer {token}")));
    }
    test::call_service(app, req.to_request()).await
}

/// Sign up a fresh account and return its session body
/// (`{id, name, email, token}`).
pub async fn signup<S, B>(app: &S, name: &str, email: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let res = post_json(
        app,
        "/api/signup",
        None,
        json!({ "name": name, "email": email, "password": "hunter2" }),
    )
    .await;
    assert_eq!(res.status(), 201, "signup should succeed");
    test::read_body_json(res).await
}

/// Create a one-hour slot for the token's owner and return its wire form.
pub async fn create_slot<S, B>(app: &S, token: &str, title: &str, status: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let res = post_json(
        app,
        "/api/events",
        Some(token),
        json!({
            "title": title,
            "startTime": "2026-09-01T09:00:00Z",
            "endTime": "2026-09-01T10:00:00Z",
            "status": status,
        }),
    )
    .await;
    assert_eq!(res.status(), 201, "slot creation should succeed");
    test::read_body_json(res).await
}

/// Extract a string field from a JSON object.
pub fn field<'a>(value: &'a Value, name: &str) -> &'a str {
    value
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("field {name} missing from {value}"))
}
