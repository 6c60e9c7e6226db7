//! Reducer trait.

use super::action::Action;
use super::state::SliceState;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Action) -> State
pub trait Reducer {
    type State: SliceState;
    type Action: Action;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State;
}
