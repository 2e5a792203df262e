//! Calendar slot-swap backend.
//!
//! Users publish calendar slots, mark them swappable, and trade them with
//! other users through propose/accept swap requests. The domain layer owns
//! the state machine; the api layer exposes it over HTTP.

pub mod api;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use api::HealthState;
pub use doc::ApiDoc;
pub use middleware::RequestCorrelation;
pub use server::{AppState, ServerConfig};
