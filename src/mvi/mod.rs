//! Unidirectional state primitives shared by the store slices.
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Selectors
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! - **State**: plain owned data, cloned to hand out snapshots
//! - **Action**: a committed fact (user input or a settled request)
//! - **Reducer**: pure function that folds an action into state

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::{LoadStatus, SliceState};
