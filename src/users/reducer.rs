//! Reducer for the users slice.

use crate::mvi::{LoadStatus, Reducer};

use super::action::UsersAction;
use super::state::UsersState;

pub struct UsersReducer;

impl Reducer for UsersReducer {
    type State = UsersState;
    type Action = UsersAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            UsersAction::FetchPending => {
                state.status = LoadStatus::Loading;
                state
            }
            UsersAction::FetchFulfilled { users } => {
                state.users = users;
                state.status = LoadStatus::Succeeded;
                state.error = None;
                state
            }
            UsersAction::FetchRejected { error } => {
                // Keep serving whatever was loaded before
                state.status = LoadStatus::Failed;
                state.error = Some(error);
                state
            }
        }
    }
}
