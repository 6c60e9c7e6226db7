//! The application store: one actor owns all state, everything else talks
//! to it through a cloneable [`Store`] handle.
//!
//! Requests run on the caller's task. Their pending/fulfilled/rejected
//! phases are sent to the actor as actions and folded in the order they
//! arrive, which is completion order, not the order requests were issued.

mod error;
mod handle;
mod root;
mod server;

pub use error::StoreError;
pub use handle::{Store, UpdateOutcome};
pub use root::{RootAction, RootReducer, RootState};
pub use server::{Snapshot, StoreServer};
