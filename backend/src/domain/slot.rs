//! Slot entity: a single owned time interval with a tradeable-status flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Tradeable status of a slot.
///
/// `BUSY ⇄ SWAPPABLE` is owner-driven; `SWAP_PENDING` is system-managed and
/// entered only when a pending swap request references the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Not available for trade.
    Busy,
    /// Explicitly marked as available for trade.
    Swappable,
    /// Locked by exactly one unresolved swap proposal.
    SwapPending,
}

impl SlotStatus {
    /// Whether an owner may request this status directly.
    ///
    /// `SWAP_PENDING` is set and cleared only by the swap coordinator.
    #[must_use]
    pub const fn is_owner_settable(self) -> bool {
        matches!(self, Self::Busy | Self::Swappable)
    }
}

/// Validation failures raised when constructing a [`Slot`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SlotValidationError {
    /// Title is empty once trimmed of whitespace.
    #[error("slot title must not be empty")]
    EmptyTitle,
    /// `start_time` is not strictly before `end_time`.
    #[error("slot start time must be before its end time")]
    EmptyInterval,
    /// Slots cannot be created already locked by a swap.
    #[error("slots cannot be created in the SWAP_PENDING state")]
    PendingAtCreation,
}

/// Input payload for [`Slot::new`].
#[derive(Debug, Clone)]
pub struct SlotDraft {
    /// Owning user.
    pub owner_id: UserId,
    /// Human-readable title, e.g. "Focus Block".
    pub title: String,
    /// Inclusive start of the interval (UTC).
    pub start_time: DateTime<Utc>,
    /// Exclusive end of the interval (UTC).
    pub end_time: DateTime<Utc>,
    /// Initial status; owners may create slots BUSY or SWAPPABLE.
    pub status: SlotStatus,
}

/// A single owned time interval.
///
/// ## Invariants
/// - `start_time < end_time`.
/// - `title` is non-empty once trimmed.
/// - `status` is mutated only through `SlotStore` operations; the entity
///   itself exposes no public setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub(super) id: Uuid,
    pub(super) owner_id: UserId,
    pub(super) title: String,
    pub(super) start_time: DateTime<Utc>,
    pub(super) end_time: DateTime<Utc>,
    pub(super) status: SlotStatus,
}

impl Slot {
    /// Create a validated slot with a fresh identifier.
    pub fn new(draft: SlotDraft) -> Result<Self, SlotValidationError> {
        if draft.title.trim().is_empty() {
            return Err(SlotValidationError::EmptyTitle);
        }
        if draft.start_time >= draft.end_time {
            return Err(SlotValidationError::EmptyInterval);
        }
        if !draft.status.is_owner_settable() {
            return Err(SlotValidationError::PendingAtCreation);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: draft.owner_id,
            title: draft.title,
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: draft.status,
        })
    }

    /// Slot identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Exclusive owner of the slot.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Slot title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Interval start (UTC).
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Interval end (UTC).
    #[must_use]
    pub const fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Current tradeable status.
    #[must_use]
    pub const fn status(&self) -> SlotStatus {
        self.status
    }
}
