//! Swap coordinator: the sole mutation entry point for swap workflows.
//!
//! The coordinator owns the combined slot + ledger state behind one
//! exclusive lock. Every operation locks, validates, mutates, and releases
//! within a single bounded critical section with no await points, so no
//! reader can ever observe a slot in SWAP_PENDING without a matching
//! PENDING request or vice versa.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::feed::{NotificationFeed, NotificationSummary};
use crate::domain::{
    Slot, SlotStatus, SlotStore, SwapError, SwapOutcome, SwapRequest, SwapRequestLedger,
    SwapRequestStatus, UserId,
};

/// Combined authoritative state.
#[derive(Debug, Default)]
struct SwapState {
    slots: SlotStore,
    ledger: SwapRequestLedger,
}

/// Orchestrates multi-entity atomic transitions across the slot store and
/// the swap request ledger.
#[derive(Debug, Default)]
pub struct SwapCoordinator {
    state: Mutex<SwapState>,
}

impl SwapCoordinator {
    /// Create a coordinator over empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the state lock.
    ///
    /// A poisoned lock means a previous operation panicked mid-flight; it is
    /// reported as retryable contention rather than corrupting callers.
    fn lock(&self) -> Result<MutexGuard<'_, SwapState>, SwapError> {
        self.state.lock().map_err(|_| {
            warn!("swap state lock poisoned");
            SwapError::ConcurrentModification
        })
    }

    /// Add a validated slot to the store.
    pub fn add_slot(&self, slot: Slot) -> Result<Slot, SwapError> {
        let mut state = self.lock()?;
        let stored = state.slots.insert(slot);
        info!(slot_id = %stored.id(), owner_id = %stored.owner_id(), "slot created");
        Ok(stored)
    }

    /// The caller's own slots, ordered by start time.
    pub fn slots_for(&self, owner: UserId) -> Result<Vec<Slot>, SwapError> {
        Ok(self.lock()?.slots.list_for_owner(owner))
    }

    /// A copy of one slot.
    pub fn slot(&self, slot_id: Uuid) -> Result<Slot, SwapError> {
        self.lock()?
            .slots
            .get(slot_id)
            .cloned()
            .ok_or(SwapError::SlotNotFound { slot_id })
    }

    /// Marketplace projection: everyone else's SWAPPABLE slots.
    pub fn marketplace_for(&self, viewer: UserId) -> Result<Vec<Slot>, SwapError> {
        Ok(self.lock()?.slots.list_swappable_excluding(viewer))
    }

    /// Owner-driven status toggle (`BUSY ⇄ SWAPPABLE`).
    pub fn set_slot_status(
        &self,
        slot_id: Uuid,
        requester: UserId,
        new_status: SlotStatus,
    ) -> Result<Slot, SwapError> {
        let slot = self.lock()?.slots.set_status(slot_id, requester, new_status)?;
        info!(slot_id = %slot_id, status = ?new_status, "slot status changed");
        Ok(slot)
    }

    /// Propose a one-for-one swap; thin pass-through to the ledger.
    pub fn propose(
        &self,
        offer_slot_id: Uuid,
        target_slot_id: Uuid,
        from_user: UserId,
    ) -> Result<SwapRequest, SwapError> {
        let mut state = self.lock()?;
        let now = Utc::now();
        let SwapState { slots, ledger } = &mut *state;
        let request = ledger.create(slots, offer_slot_id, target_slot_id, from_user, now)?;
        info!(
            request_id = %request.id(),
            offer_slot_id = %offer_slot_id,
            target_slot_id = %target_slot_id,
            "swap proposed"
        );
        Ok(request)
    }

    /// Respond to a pending swap request as its recipient.
    ///
    /// Accepting exchanges ownership of the two slots and parks both BUSY;
    /// rejecting returns both to SWAPPABLE. Either way the request reaches a
    /// terminal status, and any other pending request referencing either
    /// slot (none, unless an invariant was breached elsewhere) is cancelled.
    pub fn respond(
        &self,
        request_id: Uuid,
        responder: UserId,
        accept: bool,
    ) -> Result<SwapRequest, SwapError> {
        let mut state = self.lock()?;
        let now = Utc::now();

        let request = state
            .ledger
            .get(request_id)
            .cloned()
            .ok_or(SwapError::RequestNotFound { request_id })?;
        if request.status() != SwapRequestStatus::Pending {
            return Err(SwapError::RequestAlreadyResolved { request_id });
        }
        if request.to_user_id() != responder {
            return Err(SwapError::NotAuthorized);
        }

        let offer_id = request.offer_slot_id();
        let target_id = request.target_slot_id();

        // Defensive re-validation: both slots must still exist, still be
        // locked by this request, and still belong to the original parties.
        // A mismatch means an invariant was violated elsewhere; the request
        // is withdrawn rather than acted on.
        if let Err(err) = Self::check_request_binding(&state, &request) {
            let SwapState { slots, ledger } = &mut *state;
            ledger.resolve(request_id, SwapOutcome::Cancelled, now)?;
            for slot_id in [offer_id, target_id] {
                if slots.get(slot_id).map(Slot::status) == Some(SlotStatus::SwapPending) {
                    slots.clear_pending(slot_id, SlotStatus::Swappable)?;
                }
            }
            warn!(request_id = %request_id, error = %err, "swap request cancelled on stale binding");
            return Err(err);
        }

        let SwapState { slots, ledger } = &mut *state;
        let resolved = if accept {
            slots.exchange_owners(offer_id, target_id)?;
            slots.clear_pending(offer_id, SlotStatus::Busy)?;
            slots.clear_pending(target_id, SlotStatus::Busy)?;
            ledger.resolve(request_id, SwapOutcome::Accepted, now)?
        } else {
            slots.clear_pending(offer_id, SlotStatus::Swappable)?;
            slots.clear_pending(target_id, SlotStatus::Swappable)?;
            ledger.resolve(request_id, SwapOutcome::Rejected, now)?
        };
        info!(
            request_id = %request_id,
            accepted = accept,
            "swap request resolved"
        );

        Self::cancel_stragglers(&mut state, offer_id, target_id, request_id);
        Ok(resolved)
    }

    /// Per-user pending-request feed.
    pub fn notifications_for(&self, user: UserId) -> Result<NotificationSummary, SwapError> {
        let state = self.lock()?;
        let feed = NotificationFeed::new(&state.ledger);
        Ok(NotificationSummary {
            incoming: feed.incoming_for(user),
            outgoing: feed.outgoing_for(user),
        })
    }

    fn check_request_binding(state: &SwapState, request: &SwapRequest) -> Result<(), SwapError> {
        for (slot_id, expected_owner) in [
            (request.offer_slot_id(), request.from_user_id()),
            (request.target_slot_id(), request.to_user_id()),
        ] {
            let slot = state
                .slots
                .get(slot_id)
                .ok_or(SwapError::SlotNotFound { slot_id })?;
            if slot.status() != SlotStatus::SwapPending || slot.owner_id() != expected_owner {
                return Err(SwapError::InvalidTransition {
                    reason: format!("slot {slot_id} no longer matches the pending request"),
                });
            }
        }
        Ok(())
    }

    /// Cancel any other pending request referencing either slot.
    ///
    /// The single-active-request invariant makes this a no-op in normal
    /// operation; it exists to contain damage from bugs elsewhere.
    fn cancel_stragglers(state: &mut SwapState, offer_id: Uuid, target_id: Uuid, except: Uuid) {
        let stragglers = state
            .ledger
            .pending_referencing_either(offer_id, target_id, except);
        for straggler_id in stragglers {
            warn!(request_id = %straggler_id, "cancelling request violating single-active invariant");
            let counterparts = state
                .ledger
                .get(straggler_id)
                .map(|req| [req.offer_slot_id(), req.target_slot_id()]);
            let SwapState { slots, ledger } = &mut *state;
            if ledger
                .resolve(straggler_id, SwapOutcome::Cancelled, Utc::now())
                .is_err()
            {
                continue;
            }
            let Some(counterparts) = counterparts else {
                continue;
            };
            for slot_id in counterparts {
                if slot_id == offer_id || slot_id == target_id {
                    continue;
                }
                if slots.get(slot_id).map(Slot::status) == Some(SlotStatus::SwapPending) {
                    // Release the orphaned side back to the marketplace.
                    let _ = slots.clear_pending(slot_id, SlotStatus::Swappable);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::domain::SlotDraft;

    fn make_slot(coordinator: &SwapCoordinator, owner: UserId, title: &str, status: SlotStatus) -> Uuid {
        let start_time = Utc::now();
        let slot = Slot::new(SlotDraft {
            owner_id: owner,
            title: title.to_owned(),
            start_time,
            end_time: start_time + Duration::hours(1),
            status,
        })
        .expect("valid draft");
        coordinator.add_slot(slot).expect("insert succeeds").id()
    }

    struct Scenario {
        coordinator: SwapCoordinator,
        u1: UserId,
        u2: UserId,
        s1: Uuid,
        s2: Uuid,
    }

    /// U1 owns S1 ("Focus Block"), U2 owns S2 ("Lunch"), both SWAPPABLE.
    fn scenario() -> Scenario {
        let coordinator = SwapCoordinator::new();
        let u1 = UserId::random();
        let u2 = UserId::random();
        let s1 = make_slot(&coordinator, u1, "Focus Block", SlotStatus::Swappable);
        let s2 = make_slot(&coordinator, u2, "Lunch", SlotStatus::Swappable);
        Scenario {
            coordinator,
            u1,
            u2,
            s1,
            s2,
        }
    }

    #[test]
    fn accept_round_trip_exchanges_owners() {
        let fx = scenario();
        let request = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");
        assert_eq!(
            fx.coordinator.slot(fx.s1).expect("s1 exists").status(),
            SlotStatus::SwapPending
        );

        let resolved = fx
            .coordinator
            .respond(request.id(), fx.u2, true)
            .expect("recipient accepts");
        assert_eq!(resolved.status(), SwapRequestStatus::Accepted);
        assert!(resolved.resolved_at().is_some());

        let s1 = fx.coordinator.slot(fx.s1).expect("s1 exists");
        let s2 = fx.coordinator.slot(fx.s2).expect("s2 exists");
        assert_eq!(s1.owner_id(), fx.u2);
        assert_eq!(s2.owner_id(), fx.u1);
        assert_eq!(s1.status(), SlotStatus::Busy);
        assert_eq!(s2.status(), SlotStatus::Busy);
    }

    #[test]
    fn reject_round_trip_restores_swappable() {
        let fx = scenario();
        let request = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");

        let resolved = fx
            .coordinator
            .respond(request.id(), fx.u2, false)
            .expect("recipient rejects");
        assert_eq!(resolved.status(), SwapRequestStatus::Rejected);

        let s1 = fx.coordinator.slot(fx.s1).expect("s1 exists");
        let s2 = fx.coordinator.slot(fx.s2).expect("s2 exists");
        assert_eq!(s1.owner_id(), fx.u1);
        assert_eq!(s2.owner_id(), fx.u2);
        assert_eq!(s1.status(), SlotStatus::Swappable);
        assert_eq!(s2.status(), SlotStatus::Swappable);
    }

    #[test]
    fn busy_offer_slot_fails_without_mutation() {
        let fx = scenario();
        fx.coordinator
            .set_slot_status(fx.s1, fx.u1, SlotStatus::Busy)
            .expect("owner may mark busy");

        let err = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect_err("busy offer is ineligible");
        assert_eq!(err, SwapError::SlotNotSwappable { slot_id: fx.s1 });
        assert_eq!(
            fx.coordinator.slot(fx.s2).expect("s2 exists").status(),
            SlotStatus::Swappable
        );
    }

    #[test]
    fn only_recipient_may_respond() {
        let fx = scenario();
        let request = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");

        let err = fx
            .coordinator
            .respond(request.id(), fx.u1, true)
            .expect_err("proposer cannot respond");
        assert_eq!(err, SwapError::NotAuthorized);

        let err = fx
            .coordinator
            .respond(request.id(), UserId::random(), true)
            .expect_err("stranger cannot respond");
        assert_eq!(err, SwapError::NotAuthorized);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn resolved_requests_are_terminal(#[case] first_accepts: bool) {
        let fx = scenario();
        let request = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");
        fx.coordinator
            .respond(request.id(), fx.u2, first_accepts)
            .expect("first response succeeds");

        for accept in [true, false] {
            let err = fx
                .coordinator
                .respond(request.id(), fx.u2, accept)
                .expect_err("terminal request never resolves again");
            assert_eq!(
                err,
                SwapError::RequestAlreadyResolved {
                    request_id: request.id()
                }
            );
        }
    }

    #[test]
    fn pending_slot_locks_out_owner_edits() {
        let fx = scenario();
        fx.coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");

        let err = fx
            .coordinator
            .set_slot_status(fx.s1, fx.u1, SlotStatus::Busy)
            .expect_err("pending slots reject owner edits");
        assert!(matches!(err, SwapError::InvalidTransition { .. }));
    }

    #[test]
    fn concurrent_proposals_on_one_target_succeed_at_most_once() {
        let fx = scenario();
        let u3 = UserId::random();
        let s3 = make_slot(&fx.coordinator, u3, "Standup", SlotStatus::Swappable);

        let outcomes = std::thread::scope(|scope| {
            let first = scope.spawn(|| fx.coordinator.propose(fx.s1, fx.s2, fx.u1));
            let second = scope.spawn(|| fx.coordinator.propose(s3, fx.s2, u3));
            (
                first.join().expect("thread completes"),
                second.join().expect("thread completes"),
            )
        });

        let succeeded = [&outcomes.0, &outcomes.1]
            .iter()
            .filter(|result| result.is_ok())
            .count();
        assert_eq!(succeeded, 1, "exactly one proposal must win the race");

        let loser = if outcomes.0.is_ok() {
            outcomes.1.expect_err("loser observes a rejection")
        } else {
            outcomes.0.expect_err("loser observes a rejection")
        };
        assert!(
            matches!(
                loser,
                SwapError::SlotNotSwappable { .. } | SwapError::SlotAlreadyOffered { .. }
            ),
            "loser saw {loser:?}"
        );
    }

    #[test]
    fn notifications_reflect_ledger_state() {
        let fx = scenario();
        let request = fx
            .coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");

        let for_recipient = fx
            .coordinator
            .notifications_for(fx.u2)
            .expect("feed query succeeds");
        assert_eq!(for_recipient.incoming.len(), 1);
        assert_eq!(for_recipient.incoming[0].id(), request.id());
        assert!(for_recipient.outgoing.is_empty());

        let for_proposer = fx
            .coordinator
            .notifications_for(fx.u1)
            .expect("feed query succeeds");
        assert!(for_proposer.incoming.is_empty());
        assert_eq!(for_proposer.outgoing.len(), 1);

        fx.coordinator
            .respond(request.id(), fx.u2, false)
            .expect("rejection succeeds");
        let after = fx
            .coordinator
            .notifications_for(fx.u2)
            .expect("feed query succeeds");
        assert!(after.incoming.is_empty());
    }

    #[test]
    fn marketplace_hides_pending_and_own_slots() {
        let fx = scenario();
        let marketplace = fx
            .coordinator
            .marketplace_for(fx.u1)
            .expect("query succeeds");
        assert_eq!(marketplace.len(), 1);
        assert_eq!(marketplace[0].id(), fx.s2);

        fx.coordinator
            .propose(fx.s1, fx.s2, fx.u1)
            .expect("proposal succeeds");
        let marketplace = fx
            .coordinator
            .marketplace_for(fx.u1)
            .expect("query succeeds");
        assert!(marketplace.is_empty(), "pending slots leave the marketplace");
    }
}
