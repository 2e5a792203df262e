//! HTTP surface: handlers, the error envelope, and caller identity.

pub mod auth;
pub mod error;
pub mod events;
pub mod health;
pub mod identity;
pub mod swaps;

pub use self::error::{ApiError, ErrorBody};
pub use self::health::HealthState;
pub use self::identity::Caller;
