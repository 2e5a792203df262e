//! Domain model: the authoritative slot/swap-request state machine.
//!
//! Entities are validated at construction and mutated only through the
//! store, ledger, and coordinator operations, which enforce every invariant
//! in one place. Errors stay transport agnostic; the HTTP layer maps them
//! in `api::error`.

pub mod coordinator;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod ports;
pub mod slot;
pub mod slot_store;
pub mod swap_request;
pub mod user;

pub use self::coordinator::SwapCoordinator;
pub use self::error::{ErrorCode, SwapError};
pub use self::feed::{NotificationFeed, NotificationSummary};
pub use self::ledger::SwapRequestLedger;
pub use self::slot::{Slot, SlotDraft, SlotStatus, SlotValidationError};
pub use self::slot_store::SlotStore;
pub use self::swap_request::{SwapOutcome, SwapRequest, SwapRequestStatus};
pub use self::user::UserId;
