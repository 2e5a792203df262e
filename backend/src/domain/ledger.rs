//! Swap request ledger: record lifecycle and eligibility enforcement.
//!
//! `create` runs all of its validations before touching any state, so a
//! failure can never leave the store and the ledger disagreeing. The
//! coordinator holds the state lock for the whole call, making the final
//! insert-and-lock step indivisible.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    SlotStatus, SlotStore, SwapError, SwapOutcome, SwapRequest, SwapRequestStatus, UserId,
};

/// Owns swap request records and their lifecycle.
#[derive(Debug, Default)]
pub struct SwapRequestLedger {
    requests: Vec<SwapRequest>,
}

impl SwapRequestLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a request by id.
    #[must_use]
    pub fn get(&self, request_id: Uuid) -> Option<&SwapRequest> {
        self.requests.iter().find(|req| req.id() == request_id)
    }

    /// The single pending request referencing `slot_id`, if any.
    ///
    /// Under the invariants there is at most one; the first match is
    /// returned.
    #[must_use]
    pub fn pending_referencing(&self, slot_id: Uuid) -> Option<&SwapRequest> {
        self.requests
            .iter()
            .find(|req| req.status() == SwapRequestStatus::Pending && req.references(slot_id))
    }

    /// Ids of pending requests referencing either slot, excluding `except`.
    ///
    /// Used by the coordinator's defensive cascade; the set is empty unless
    /// an invariant was violated elsewhere.
    #[must_use]
    pub fn pending_referencing_either(
        &self,
        first: Uuid,
        second: Uuid,
        except: Uuid,
    ) -> Vec<Uuid> {
        self.requests
            .iter()
            .filter(|req| {
                req.id() != except
                    && req.status() == SwapRequestStatus::Pending
                    && (req.references(first) || req.references(second))
            })
            .map(SwapRequest::id)
            .collect()
    }

    /// Pending requests addressed to `user`, oldest first.
    #[must_use]
    pub fn pending_to(&self, user: UserId) -> Vec<SwapRequest> {
        self.pending_matching(|req| req.to_user_id() == user)
    }

    /// Pending requests proposed by `user`, oldest first.
    #[must_use]
    pub fn pending_from(&self, user: UserId) -> Vec<SwapRequest> {
        self.pending_matching(|req| req.from_user_id() == user)
    }

    fn pending_matching(&self, predicate: impl Fn(&SwapRequest) -> bool) -> Vec<SwapRequest> {
        let mut matching: Vec<SwapRequest> = self
            .requests
            .iter()
            .filter(|req| req.status() == SwapRequestStatus::Pending && predicate(req))
            .cloned()
            .collect();
        matching.sort_by_key(SwapRequest::created_at);
        matching
    }

    /// Create a pending request offering `offer_slot_id` for
    /// `target_slot_id`, locking both slots.
    ///
    /// Validation order follows the contract: existence, ownership,
    /// swappability, then the pending-reference guard. Only after every
    /// check passes are the request inserted and both slots marked
    /// SWAP_PENDING; a failure therefore mutates nothing.
    pub fn create(
        &mut self,
        slots: &mut SlotStore,
        offer_slot_id: Uuid,
        target_slot_id: Uuid,
        from_user: UserId,
        now: DateTime<Utc>,
    ) -> Result<SwapRequest, SwapError> {
        let offer = slots.get(offer_slot_id).ok_or(SwapError::SlotNotFound {
            slot_id: offer_slot_id,
        })?;
        let target = slots.get(target_slot_id).ok_or(SwapError::SlotNotFound {
            slot_id: target_slot_id,
        })?;

        if offer.owner_id() != from_user {
            return Err(SwapError::NotOwner {
                slot_id: offer_slot_id,
            });
        }
        if target.owner_id() == from_user {
            return Err(SwapError::SelfSwap);
        }

        for (slot, slot_id) in [(offer, offer_slot_id), (target, target_slot_id)] {
            if slot.status() != SlotStatus::Swappable {
                return Err(SwapError::SlotNotSwappable { slot_id });
            }
            // A SWAPPABLE slot can never be referenced by a pending request
            // under the invariants; checked anyway so a breach surfaces here
            // rather than as corrupted state.
            if self.pending_referencing(slot_id).is_some() {
                return Err(SwapError::SlotAlreadyOffered { slot_id });
            }
        }

        let to_user = target.owner_id();
        slots.mark_pending(offer_slot_id)?;
        if let Err(err) = slots.mark_pending(target_slot_id) {
            // Unreachable after validation; undo the first lock so a bug
            // cannot leave partial state behind.
            slots.clear_pending(offer_slot_id, SlotStatus::Swappable)?;
            return Err(err);
        }

        let request = SwapRequest::pending(
            offer_slot_id,
            target_slot_id,
            from_user,
            to_user,
            now,
        );
        self.requests.push(request.clone());
        Ok(request)
    }

    /// System-only: apply a terminal outcome to a pending request.
    ///
    /// Fails with `RequestNotFound` for unknown ids and
    /// `RequestAlreadyResolved` when the request has already left PENDING.
    pub(crate) fn resolve(
        &mut self,
        request_id: Uuid,
        outcome: SwapOutcome,
        now: DateTime<Utc>,
    ) -> Result<SwapRequest, SwapError> {
        let request = self
            .requests
            .iter_mut()
            .find(|req| req.id() == request_id)
            .ok_or(SwapError::RequestNotFound { request_id })?;
        request.resolve(outcome, now)?;
        Ok(request.clone())
    }
}
