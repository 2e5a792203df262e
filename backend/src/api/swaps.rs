//! Swap proposal, response, and notification endpoints.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::identity::Caller;
use crate::domain::{NotificationSummary, SwapRequest};
use crate::server::AppState;

/// Payload for `POST /api/swap-request`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapProposal {
    /// The caller's slot offered in exchange.
    pub my_slot_id: Uuid,
    /// The other user's slot the caller wants.
    pub desired_slot_id: Uuid,
}

/// Payload for `POST /api/swap-response`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapDecision {
    /// The pending request being answered.
    pub request_id: Uuid,
    /// `true` accepts the swap, `false` rejects it.
    pub accepted: bool,
}

/// Propose swapping one of the caller's slots for another user's slot.
///
/// Both slots must be `SWAPPABLE`; on success both move to `SWAP_PENDING`
/// and stay locked until the recipient answers.
#[utoipa::path(
    post,
    path = "/api/swap-request",
    tags = ["swaps"],
    request_body = SwapProposal,
    responses(
        (status = 201, description = "Pending swap request", body = SwapRequest),
        (status = 400, description = "Malformed payload or self swap", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller does not own the offered slot", body = crate::api::error::ErrorBody),
        (status = 404, description = "A referenced slot does not exist", body = crate::api::error::ErrorBody),
        (status = 409, description = "A slot is not available for swapping", body = crate::api::error::ErrorBody)
    )
)]
#[post("/swap-request")]
pub async fn propose_swap(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<SwapProposal>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let request = state
        .coordinator
        .propose(body.my_slot_id, body.desired_slot_id, caller.id())?;
    Ok(HttpResponse::Created().json(request))
}

/// Accept or reject a pending swap request addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/swap-response",
    tags = ["swaps"],
    request_body = SwapDecision,
    responses(
        (status = 200, description = "Resolved swap request", body = SwapRequest),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is not the request's recipient", body = crate::api::error::ErrorBody),
        (status = 404, description = "No such request", body = crate::api::error::ErrorBody),
        (status = 409, description = "Request already resolved or slots changed", body = crate::api::error::ErrorBody)
    )
)]
#[post("/swap-response")]
pub async fn respond_to_swap(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<SwapDecision>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let request = state
        .coordinator
        .respond(body.request_id, caller.id(), body.accepted)?;
    Ok(HttpResponse::Ok().json(request))
}

/// Pending swap requests involving the caller, incoming and outgoing.
#[utoipa::path(
    get,
    path = "/api/swap-requests",
    tags = ["swaps"],
    responses(
        (status = 200, description = "Pending requests involving the caller", body = NotificationSummary),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
#[get("/swap-requests")]
pub async fn list_swap_requests(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let summary = state.coordinator.notifications_for(caller.id())?;
    Ok(HttpResponse::Ok().json(summary))
}
