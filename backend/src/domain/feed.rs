//! Notification feed: read-only pending-request projections.
//!
//! Pure queries over the ledger; the feed never mutates and reflects
//! committed state at call time.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{SwapRequest, SwapRequestLedger, UserId};

/// Read-only view over the ledger.
pub struct NotificationFeed<'a> {
    ledger: &'a SwapRequestLedger,
}

impl<'a> NotificationFeed<'a> {
    /// Borrow the ledger for querying.
    #[must_use]
    pub const fn new(ledger: &'a SwapRequestLedger) -> Self {
        Self { ledger }
    }

    /// Pending requests awaiting a response from `user`.
    #[must_use]
    pub fn incoming_for(&self, user: UserId) -> Vec<SwapRequest> {
        self.ledger.pending_to(user)
    }

    /// Pending requests proposed by `user` and not yet answered.
    #[must_use]
    pub fn outgoing_for(&self, user: UserId) -> Vec<SwapRequest> {
        self.ledger.pending_from(user)
    }
}

/// Combined per-user feed returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    /// Requests the user can accept or reject.
    pub incoming: Vec<SwapRequest>,
    /// Requests the user has proposed and is waiting on.
    pub outgoing: Vec<SwapRequest>,
}
