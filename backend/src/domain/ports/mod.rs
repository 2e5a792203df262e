//! Driven ports implemented by outbound adapters.
//!
//! The swap core treats session resolution and account storage as external
//! collaborators; these traits are the seams. Adapters live under
//! `outbound`; tests mock the traits with `mockall`.

pub mod accounts;
pub mod session;

pub use self::accounts::{AccountDirectory, AccountError, AuthenticatedUser};
pub use self::session::{SessionError, SessionService, SessionToken};
