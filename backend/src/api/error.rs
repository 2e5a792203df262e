//! HTTP error envelope.
//!
//! Domain errors stay transport agnostic; this module owns the mapping
//! from [`ErrorCode`] to an HTTP status and renders the JSON body clients
//! consume. The envelope shape is stable: `code` drives client behaviour,
//! `message` is for humans, `details` is optional structure, `requestId`
//! echoes the correlation id when one is present.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{AccountError, SessionError};
use crate::domain::{ErrorCode, SlotValidationError, SwapError};
use crate::middleware::current_request_id;

/// JSON body returned for every error response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Human-readable summary.
    pub message: String,
    /// Optional structured context, e.g. the offending id.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Correlation id of the failed request, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error type returned by every handler.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    /// Build an error from a code and message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured context to the envelope.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Missing or unresolvable credentials.
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "authentication required")
    }

    /// Malformed request payload.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// The stable code carried in the body.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    const fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::AuthRequired => StatusCode::UNAUTHORIZED,
            ErrorCode::NotOwner | ErrorCode::NotAuthorized => StatusCode::FORBIDDEN,
            ErrorCode::SlotNotFound | ErrorCode::RequestNotFound => StatusCode::NOT_FOUND,
            ErrorCode::SelfSwap | ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::SlotNotSwappable
            | ErrorCode::SlotAlreadyOffered
            | ErrorCode::InvalidTransition
            | ErrorCode::RequestAlreadyResolved
            | ErrorCode::EmailTaken => StatusCode::CONFLICT,
            ErrorCode::ConcurrentModification => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "request failed");
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "request rejected");
        }
        HttpResponse::build(status).json(ErrorBody {
            code: self.code,
            message: self.message.clone(),
            details: self.details.clone(),
            request_id: current_request_id(),
        })
    }
}

impl From<SwapError> for ApiError {
    fn from(err: SwapError) -> Self {
        let code = err.code();
        let details = match &err {
            SwapError::SlotNotFound { slot_id }
            | SwapError::NotOwner { slot_id }
            | SwapError::SlotNotSwappable { slot_id }
            | SwapError::SlotAlreadyOffered { slot_id } => {
                Some(serde_json::json!({ "slotId": slot_id }))
            }
            SwapError::RequestNotFound { request_id }
            | SwapError::RequestAlreadyResolved { request_id } => {
                Some(serde_json::json!({ "requestId": request_id }))
            }
            _ => None,
        };
        let mut api = Self::new(code, err.to_string());
        api.details = details;
        api
    }
}

impl From<SlotValidationError> for ApiError {
    fn from(err: SlotValidationError) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::EmailTaken { ref email } => {
                let details = serde_json::json!({ "email": email });
                Self::new(ErrorCode::EmailTaken, err.to_string()).with_details(details)
            }
            AccountError::Unavailable { .. } => {
                tracing::error!(error = %err, "account adapter failure");
                Self::new(ErrorCode::InternalError, "internal error")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!(error = %err, "session adapter failure");
        Self::new(ErrorCode::InternalError, "internal error")
    }
}
