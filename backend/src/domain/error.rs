//! Domain-level error types.
//!
//! Failures are transport agnostic and carry the specific kind that caused
//! them; inbound adapters map them to HTTP status codes and payloads in
//! `api::error`. Nothing here is ever downgraded to a generic failure.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable machine-readable code identifying the failure category.
///
/// The first eleven variants are the swap-workflow taxonomy; the remainder
/// cover the outer HTTP surface (malformed payloads, signup conflicts, and
/// unexpected faults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Authentication is missing or the bearer token is unknown.
    AuthRequired,
    /// The caller does not own the slot they tried to mutate or offer.
    NotOwner,
    /// Offer and target slot belong to the same owner.
    SelfSwap,
    /// The referenced slot does not exist.
    SlotNotFound,
    /// The referenced slot is not marked SWAPPABLE.
    SlotNotSwappable,
    /// The referenced slot is already locked by a pending request.
    SlotAlreadyOffered,
    /// The requested status change is not a legal transition.
    InvalidTransition,
    /// The referenced swap request does not exist.
    RequestNotFound,
    /// The swap request has already reached a terminal status.
    RequestAlreadyResolved,
    /// Only the request recipient may respond.
    NotAuthorized,
    /// State contention; the caller may retry the operation.
    ConcurrentModification,
    /// The request payload is malformed or fails validation.
    InvalidRequest,
    /// An account already exists for the supplied email address.
    EmailTaken,
    /// An unexpected error occurred inside the service.
    InternalError,
}

/// Failure raised by slot and swap-request operations.
///
/// Every validation failure is detected before any mutation, so an error
/// return always means no state changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SwapError {
    /// Bearer token absent, malformed, or unknown.
    #[error("authentication required")]
    AuthRequired,
    /// Caller is not the owner of the slot.
    #[error("slot {slot_id} is not owned by the caller")]
    NotOwner {
        /// Slot whose ownership check failed.
        slot_id: Uuid,
    },
    /// Offer and target slots share an owner.
    #[error("offer and target slots must belong to different owners")]
    SelfSwap,
    /// No slot with the given id.
    #[error("slot {slot_id} not found")]
    SlotNotFound {
        /// Missing slot id.
        slot_id: Uuid,
    },
    /// Slot is not currently marked SWAPPABLE.
    #[error("slot {slot_id} is not marked swappable")]
    SlotNotSwappable {
        /// Offending slot id.
        slot_id: Uuid,
    },
    /// Slot is already referenced by a pending request.
    #[error("slot {slot_id} is already part of a pending swap")]
    SlotAlreadyOffered {
        /// Offending slot id.
        slot_id: Uuid,
    },
    /// The status change violates the slot state machine.
    #[error("invalid status transition: {reason}")]
    InvalidTransition {
        /// Why the transition is rejected.
        reason: String,
    },
    /// No swap request with the given id.
    #[error("swap request {request_id} not found")]
    RequestNotFound {
        /// Missing request id.
        request_id: Uuid,
    },
    /// The request already reached ACCEPTED, REJECTED, or CANCELLED.
    #[error("swap request {request_id} is already resolved")]
    RequestAlreadyResolved {
        /// Resolved request id.
        request_id: Uuid,
    },
    /// The responder is not the recipient of the request.
    #[error("only the request recipient may respond")]
    NotAuthorized,
    /// Shared state is contended; retry the operation.
    #[error("swap state is contended; retry the operation")]
    ConcurrentModification,
}

impl SwapError {
    /// Stable code for the wire envelope.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AuthRequired => ErrorCode::AuthRequired,
            Self::NotOwner { .. } => ErrorCode::NotOwner,
            Self::SelfSwap => ErrorCode::SelfSwap,
            Self::SlotNotFound { .. } => ErrorCode::SlotNotFound,
            Self::SlotNotSwappable { .. } => ErrorCode::SlotNotSwappable,
            Self::SlotAlreadyOffered { .. } => ErrorCode::SlotAlreadyOffered,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::RequestNotFound { .. } => ErrorCode::RequestNotFound,
            Self::RequestAlreadyResolved { .. } => ErrorCode::RequestAlreadyResolved,
            Self::NotAuthorized => ErrorCode::NotAuthorized,
            Self::ConcurrentModification => ErrorCode::ConcurrentModification,
        }
    }

    /// Whether the caller may retry the same call unchanged.
    ///
    /// Only contention is retryable; every other kind requires a new,
    /// corrected request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_taxonomy() {
        let slot_id = Uuid::new_v4();
        assert_eq!(SwapError::AuthRequired.code(), ErrorCode::AuthRequired);
        assert_eq!(
            SwapError::SlotAlreadyOffered { slot_id }.code(),
            ErrorCode::SlotAlreadyOffered
        );
        assert_eq!(
            SwapError::ConcurrentModification.code(),
            ErrorCode::ConcurrentModification
        );
    }

    #[test]
    fn only_contention_is_retryable() {
        assert!(SwapError::ConcurrentModification.is_retryable());
        assert!(!SwapError::SelfSwap.is_retryable());
        assert!(
            !SwapError::RequestNotFound {
                request_id: Uuid::new_v4()
            }
            .is_retryable()
        );
    }

    #[test]
    fn code_serialises_snake_case() {
        let json = serde_json::to_string(&ErrorCode::SlotNotSwappable).expect("serialise code");
        assert_eq!(json, "\"slot_not_swappable\"");
    }

    #[test]
    fn messages_name_the_offending_entity() {
        let slot_id = Uuid::new_v4();
        let message = SwapError::SlotNotFound { slot_id }.to_string();
        assert!(message.contains(&slot_id.to_string()));
    }
}
