//! Posts slice: the canonical post collection and its request lifecycle.

mod action;
mod reducer;
mod state;

pub use action::PostsAction;
pub use reducer::PostsReducer;
pub use state::{FetchPolicy, PostsState};
