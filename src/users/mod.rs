//! Users slice: post authors, fetched once per session.

mod action;
mod reducer;
mod state;

pub use action::UsersAction;
pub use reducer::UsersReducer;
pub use state::UsersState;
