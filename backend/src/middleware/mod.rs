//! HTTP middleware.

pub mod request_id;

pub use self::request_id::{RequestCorrelation, RequestId, current_request_id};
