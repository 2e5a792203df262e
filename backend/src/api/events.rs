//! Calendar event endpoints: listing, creation, status changes, and the
//! swappable-slot marketplace.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::identity::Caller;
use crate::domain::{Slot, SlotDraft, SlotStatus};
use crate::server::AppState;

/// Payload for `POST /api/events`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event title; must not be blank.
    pub title: String,
    /// Start of the interval.
    pub start_time: DateTime<Utc>,
    /// End of the interval; must follow the start.
    pub end_time: DateTime<Utc>,
    /// Initial status. Defaults to `BUSY`; `SWAP_PENDING` is rejected.
    #[serde(default)]
    pub status: Option<SlotStatus>,
}

/// Payload for `PUT /api/events/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// The status to move the slot to.
    pub status: SlotStatus,
}

/// List the caller's own slots, ordered by start time.
#[utoipa::path(
    get,
    path = "/api/events",
    tags = ["events"],
    responses(
        (status = 200, description = "The caller's slots", body = [Slot]),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let slots = state.coordinator.slots_for(caller.id())?;
    Ok(HttpResponse::Ok().json(slots))
}

/// Create a slot owned by the caller.
#[utoipa::path(
    post,
    path = "/api/events",
    tags = ["events"],
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Slot created", body = Slot),
        (status = 400, description = "Malformed payload", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let slot = Slot::new(SlotDraft {
        owner_id: caller.id(),
        title: body.title,
        start_time: body.start_time,
        end_time: body.end_time,
        status: body.status.unwrap_or(SlotStatus::Busy),
    })?;
    let slot = state.coordinator.add_slot(slot)?;
    Ok(HttpResponse::Created().json(slot))
}

/// Change a slot's status between `BUSY` and `SWAPPABLE`.
///
/// Slots locked by a pending swap cannot be edited until the request
/// resolves, and `SWAP_PENDING` can never be set directly.
#[utoipa::path(
    put,
    path = "/api/events/{id}/status",
    tags = ["events"],
    params(("id" = Uuid, Path, description = "Slot identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated slot", body = Slot),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller does not own the slot", body = crate::api::error::ErrorBody),
        (status = 404, description = "No such slot", body = crate::api::error::ErrorBody),
        (status = 409, description = "Transition not allowed", body = crate::api::error::ErrorBody)
    )
)]
#[put("/events/{id}/status")]
pub async fn update_event_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let slot_id = path.into_inner();
    let slot = state
        .coordinator
        .set_slot_status(slot_id, caller.id(), body.status)?;
    Ok(HttpResponse::Ok().json(slot))
}

/// List swappable slots owned by other users.
#[utoipa::path(
    get,
    path = "/api/swappable-slots",
    tags = ["events"],
    responses(
        (status = 200, description = "Swappable slots owned by others", body = [Slot]),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
#[get("/swappable-slots")]
pub async fn list_swappable_slots(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let slots = state.coordinator.marketplace_for(caller.id())?;
    Ok(HttpResponse::Ok().json(slots))
}
