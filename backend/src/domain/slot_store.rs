//! Canonical slot store with ownership and precondition checks.
//!
//! The store is a plain map; serialisation of concurrent access is the
//! coordinator's job. All status transitions flow through the operations
//! here, so the slot state machine is enforced in exactly one place.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Slot, SlotStatus, SwapError, UserId};

/// Owns the canonical set of slots.
#[derive(Debug, Default)]
pub struct SlotStore {
    slots: HashMap<Uuid, Slot>,
}

impl SlotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated slot and return a copy of the stored record.
    pub fn insert(&mut self, slot: Slot) -> Slot {
        let stored = slot.clone();
        self.slots.insert(slot.id, slot);
        stored
    }

    /// Look up a slot by id.
    #[must_use]
    pub fn get(&self, slot_id: Uuid) -> Option<&Slot> {
        self.slots.get(&slot_id)
    }

    /// All slots owned by `owner`, ordered by start time.
    #[must_use]
    pub fn list_for_owner(&self, owner: UserId) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .slots
            .values()
            .filter(|slot| slot.owner_id == owner)
            .cloned()
            .collect();
        slots.sort_by_key(Slot::start_time);
        slots
    }

    /// All SWAPPABLE slots excluding those owned by `viewer`, ordered by
    /// start time. This is the marketplace projection.
    #[must_use]
    pub fn list_swappable_excluding(&self, viewer: UserId) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .slots
            .values()
            .filter(|slot| slot.status == SlotStatus::Swappable && slot.owner_id != viewer)
            .cloned()
            .collect();
        slots.sort_by_key(Slot::start_time);
        slots
    }

    /// Owner-driven status change: `BUSY ⇄ SWAPPABLE`.
    ///
    /// Rejected when the requester is not the owner, when the slot is
    /// currently SWAP_PENDING, or when the requested status is not
    /// owner-settable. SWAP_PENDING is system-managed and can be neither set
    /// nor cleared here.
    pub fn set_status(
        &mut self,
        slot_id: Uuid,
        requester: UserId,
        new_status: SlotStatus,
    ) -> Result<Slot, SwapError> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or(SwapError::SlotNotFound { slot_id })?;
        if slot.owner_id != requester {
            return Err(SwapError::NotOwner { slot_id });
        }
        if slot.status == SlotStatus::SwapPending {
            return Err(SwapError::InvalidTransition {
                reason: format!("slot {slot_id} is locked by a pending swap"),
            });
        }
        if !new_status.is_owner_settable() {
            return Err(SwapError::InvalidTransition {
                reason: "SWAP_PENDING is system-managed and cannot be set directly".to_owned(),
            });
        }
        slot.status = new_status;
        Ok(slot.clone())
    }

    /// System-only: lock a SWAPPABLE slot for a pending swap.
    ///
    /// Invoked exclusively by the coordinator/ledger while holding the state
    /// lock; never exposed to end users.
    pub(crate) fn mark_pending(&mut self, slot_id: Uuid) -> Result<(), SwapError> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or(SwapError::SlotNotFound { slot_id })?;
        if slot.status != SlotStatus::Swappable {
            return Err(SwapError::SlotNotSwappable { slot_id });
        }
        slot.status = SlotStatus::SwapPending;
        Ok(())
    }

    /// System-only: release a SWAP_PENDING slot into `resulting_status`.
    pub(crate) fn clear_pending(
        &mut self,
        slot_id: Uuid,
        resulting_status: SlotStatus,
    ) -> Result<(), SwapError> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or(SwapError::SlotNotFound { slot_id })?;
        if slot.status != SlotStatus::SwapPending {
            return Err(SwapError::InvalidTransition {
                reason: format!("slot {slot_id} is not pending"),
            });
        }
        if !resulting_status.is_owner_settable() {
            return Err(SwapError::InvalidTransition {
                reason: "pending slots must resolve to BUSY or SWAPPABLE".to_owned(),
            });
        }
        slot.status = resulting_status;
        Ok(())
    }

    /// System-only: exchange ownership between two slots.
    ///
    /// The swap's only ownership-mutating step; statuses are untouched.
    pub(crate) fn exchange_owners(&mut self, first: Uuid, second: Uuid) -> Result<(), SwapError> {
        let first_owner = self
            .slots
            .get(&first)
            .ok_or(SwapError::SlotNotFound { slot_id: first })?
            .owner_id;
        let second_owner = self
            .slots
            .get(&second)
            .ok_or(SwapError::SlotNotFound { slot_id: second })?
            .owner_id;
        if let Some(slot) = self.slots.get_mut(&first) {
            slot.owner_id = second_owner;
        }
        if let Some(slot) = self.slots.get_mut(&second) {
            slot.owner_id = first_owner;
        }
        Ok(())
    }
}
