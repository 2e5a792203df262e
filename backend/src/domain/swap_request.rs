//! Swap request entity: a proposal to exchange ownership of two slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{SwapError, UserId};

/// Lifecycle status of a swap request.
///
/// `PENDING` is the only non-terminal status; transitions are monotonic and
/// no edge ever re-enters `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapRequestStatus {
    /// Awaiting a response from the recipient.
    Pending,
    /// Recipient accepted; slot ownership was exchanged.
    Accepted,
    /// Recipient rejected; both slots returned to SWAPPABLE.
    Rejected,
    /// System-cancelled (defensive cascade or invariant breach).
    Cancelled,
}

impl SwapRequestStatus {
    /// Whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Terminal outcome applied when resolving a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Recipient accepted the proposal.
    Accepted,
    /// Recipient rejected the proposal.
    Rejected,
    /// The system invalidated the proposal.
    Cancelled,
}

impl From<SwapOutcome> for SwapRequestStatus {
    fn from(value: SwapOutcome) -> Self {
        match value {
            SwapOutcome::Accepted => Self::Accepted,
            SwapOutcome::Rejected => Self::Rejected,
            SwapOutcome::Cancelled => Self::Cancelled,
        }
    }
}

/// A proposal to exchange ownership of two slots between two users.
///
/// ## Invariants
/// - `from_user_id` owned `offer_slot_id` and `to_user_id` owned
///   `target_slot_id` at creation time.
/// - `resolved_at` is `Some` exactly when `status` is terminal, and the
///   record is immutable from that point on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub(super) id: Uuid,
    pub(super) offer_slot_id: Uuid,
    pub(super) target_slot_id: Uuid,
    pub(super) from_user_id: UserId,
    pub(super) to_user_id: UserId,
    pub(super) status: SwapRequestStatus,
    pub(super) created_at: DateTime<Utc>,
    pub(super) resolved_at: Option<DateTime<Utc>>,
}

impl SwapRequest {
    /// Build a fresh pending request. Eligibility of the referenced slots is
    /// the ledger's responsibility; this constructor is crate-internal.
    pub(super) fn pending(
        offer_slot_id: Uuid,
        target_slot_id: Uuid,
        from_user_id: UserId,
        to_user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            offer_slot_id,
            target_slot_id,
            from_user_id,
            to_user_id,
            status: SwapRequestStatus::Pending,
            created_at,
            resolved_at: None,
        }
    }

    /// Request identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Slot offered by the proposer.
    #[must_use]
    pub const fn offer_slot_id(&self) -> Uuid {
        self.offer_slot_id
    }

    /// Slot the proposer wants in exchange.
    #[must_use]
    pub const fn target_slot_id(&self) -> Uuid {
        self.target_slot_id
    }

    /// Proposing user; owned the offer slot at creation time.
    #[must_use]
    pub const fn from_user_id(&self) -> UserId {
        self.from_user_id
    }

    /// Recipient user; owned the target slot at creation time.
    #[must_use]
    pub const fn to_user_id(&self) -> UserId {
        self.to_user_id
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SwapRequestStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Resolution timestamp, set once the request reaches a terminal status.
    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Whether the request references the given slot on either side.
    #[must_use]
    pub fn references(&self, slot_id: Uuid) -> bool {
        self.offer_slot_id == slot_id || self.target_slot_id == slot_id
    }

    /// Apply a terminal outcome.
    ///
    /// Fails with [`SwapError::RequestAlreadyResolved`] when the request has
    /// already left `PENDING`; terminal records never change again.
    pub(super) fn resolve(
        &mut self,
        outcome: SwapOutcome,
        resolved_at: DateTime<Utc>,
    ) -> Result<(), SwapError> {
        if self.status.is_terminal() {
            return Err(SwapError::RequestAlreadyResolved {
                request_id: self.id,
            });
        }
        self.status = outcome.into();
        self.resolved_at = Some(resolved_at);
        Ok(())
    }
}
