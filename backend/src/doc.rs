//! OpenAPI documentation.
//!
//! [`ApiDoc`] assembles the generated specification: every HTTP path, the
//! wire schemas, and the bearer-token security scheme. The document is
//! served as JSON from `/api-docs/openapi.json` for external tooling.

use actix_web::{HttpResponse, get};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::auth::{LoginRequest, SessionResponse, SignupRequest};
use crate::api::error::ErrorBody;
use crate::api::events::{CreateEventRequest, UpdateStatusRequest};
use crate::api::swaps::{SwapDecision, SwapProposal};
use crate::domain::{
    ErrorCode, NotificationSummary, Slot, SlotStatus, SwapRequest, SwapRequestStatus,
};

/// Registers the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Token issued by POST /api/signup or POST /api/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the slot-swap API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Slot-swap backend API",
        description = "Calendar slot publication and peer-to-peer swap coordination."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::events::list_events,
        crate::api::events::create_event,
        crate::api::events::update_event_status,
        crate::api::events::list_swappable_slots,
        crate::api::swaps::propose_swap,
        crate::api::swaps::respond_to_swap,
        crate::api::swaps::list_swap_requests,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        Slot,
        SlotStatus,
        SwapRequest,
        SwapRequestStatus,
        NotificationSummary,
        ErrorBody,
        ErrorCode,
        SignupRequest,
        LoginRequest,
        SessionResponse,
        CreateEventRequest,
        UpdateStatusRequest,
        SwapProposal,
        SwapDecision,
    )),
    tags(
        (name = "auth", description = "Account signup and login"),
        (name = "events", description = "Calendar slots and the swap marketplace"),
        (name = "swaps", description = "Swap proposals and responses"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve the generated specification as JSON.
#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
