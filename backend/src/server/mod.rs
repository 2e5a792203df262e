//! Application assembly: shared state, route wiring, and the HTTP server.

pub mod config;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::api::{auth, events, health, swaps};
use crate::domain::SwapCoordinator;
use crate::domain::ports::{AccountDirectory, SessionService};
use crate::middleware::RequestCorrelation;
use crate::outbound::MemoryAccounts;

pub use self::config::ServerConfig;

/// Shared state handed to every handler.
pub struct AppState {
    /// The slot/swap-request state machine.
    pub coordinator: Arc<SwapCoordinator>,
    /// Account registration and credential checks.
    pub accounts: Arc<dyn AccountDirectory>,
    /// Bearer-token session resolution.
    pub sessions: Arc<dyn SessionService>,
}

impl AppState {
    /// Assemble state from explicit adapters.
    #[must_use]
    pub fn new(
        coordinator: Arc<SwapCoordinator>,
        accounts: Arc<dyn AccountDirectory>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            coordinator,
            accounts,
            sessions,
        }
    }

    /// State backed entirely by in-memory adapters.
    #[must_use]
    pub fn in_memory() -> Self {
        let directory = Arc::new(MemoryAccounts::new());
        Self::new(Arc::new(SwapCoordinator::new()), directory.clone(), directory)
    }
}

/// Register the `/api` routes and OpenAPI document on a service config.
///
/// Shared between the production server and the integration test harness.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        // Malformed JSON bodies use the same envelope as domain failures.
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| crate::api::ApiError::invalid_request(err.to_string()).into());
        cfg.app_data(state)
            .app_data(json_config)
            .service(
                web::scope("/api")
                    .service(auth::signup)
                    .service(auth::login)
                    .service(auth::logout)
                    .service(events::list_events)
                    .service(events::create_event)
                    .service(events::update_event_status)
                    .service(events::list_swappable_slots)
                    .service(swaps::propose_swap)
                    .service(swaps::respond_to_swap)
                    .service(swaps::list_swap_requests),
            )
            .service(crate::doc::openapi_json);
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::in_memory());
    let health_state = web::Data::new(health::HealthState::new());
    let server_health_state = health_state.clone();

    let addr = server_config.bind_addr();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestCorrelation)
            .app_data(server_health_state.clone())
            .service(health::ready)
            .service(health::live)
            .configure(configure(state.clone()))
    })
    .bind(addr)?;

    info!(%addr, "listening");
    health_state.mark_ready();
    server.run().await
}
