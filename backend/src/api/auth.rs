//! Account signup and login endpoints.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::identity::{Caller, bearer_token};
use crate::domain::UserId;
use crate::domain::ports::AuthenticatedUser;
use crate::server::AppState;

/// Payload for `POST /api/signup`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Display name for the new account.
    pub name: String,
    /// Login email, unique per account.
    pub email: String,
    /// Plain-text password; hashed before storage.
    pub password: String,
}

/// Payload for `POST /api/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body returned by both signup and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// The account's user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Bearer token for subsequent requests.
    pub token: String,
}

fn require_field(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_request(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ApiError> {
    require_field(value, "email")?;
    if !value.contains('@') {
        return Err(ApiError::invalid_request("email is not a valid address"));
    }
    Ok(())
}

async fn session_for(
    state: &AppState,
    user: AuthenticatedUser,
) -> Result<SessionResponse, ApiError> {
    let token = state.sessions.issue(user.id).await?;
    Ok(SessionResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token: token.into(),
    })
}

/// Register an account and start a session.
#[utoipa::path(
    post,
    path = "/api/signup",
    tags = ["auth"],
    security([]),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Malformed payload", body = crate::api::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::api::error::ErrorBody)
    )
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    require_field(&body.name, "name")?;
    require_email(&body.email)?;
    require_field(&body.password, "password")?;

    let user = state
        .accounts
        .register(&body.name, &body.email, &body.password)
        .await?;
    tracing::info!(user_id = %user.id, "account registered");
    let session = session_for(&state, user).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/login",
    tags = ["auth"],
    security([]),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = SessionResponse),
        (status = 400, description = "Malformed payload", body = crate::api::error::ErrorBody),
        (status = 401, description = "Unknown email or wrong password", body = crate::api::error::ErrorBody)
    )
)]
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    require_email(&body.email)?;
    require_field(&body.password, "password")?;

    let user = state
        .accounts
        .verify(&body.email, &body.password)
        .await?
        .ok_or_else(ApiError::auth_required)?;
    tracing::debug!(user_id = %user.id, "login succeeded");
    let session = session_for(&state, user).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// End the current session; the token stops resolving immediately.
#[utoipa::path(
    post,
    path = "/api/logout",
    tags = ["auth"],
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    if let Some(token) = bearer_token(&req) {
        state.sessions.revoke(&token).await?;
    }
    tracing::debug!(user_id = %caller.id(), "session revoked");
    Ok(HttpResponse::NoContent().finish())
}
