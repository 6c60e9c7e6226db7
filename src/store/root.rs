//! Combined state of all slices.

use crate::mvi::{Action, Reducer, SliceState};
use crate::posts::{FetchPolicy, PostsAction, PostsReducer, PostsState};
use crate::users::{UsersAction, UsersReducer, UsersState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub posts: PostsState,
    pub users: UsersState,
}

impl SliceState for RootState {}

impl RootState {
    pub fn new(fetch_policy: FetchPolicy) -> Self {
        Self {
            posts: PostsState::new(fetch_policy),
            users: UsersState::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RootAction {
    Posts(PostsAction),
    Users(UsersAction),
}

impl Action for RootAction {}

impl From<PostsAction> for RootAction {
    fn from(action: PostsAction) -> Self {
        RootAction::Posts(action)
    }
}

impl From<UsersAction> for RootAction {
    fn from(action: UsersAction) -> Self {
        RootAction::Users(action)
    }
}

/// Routes each action to the slice that owns it.
pub struct RootReducer;

impl Reducer for RootReducer {
    type State = RootState;
    type Action = RootAction;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State {
        let RootState { posts, users } = state;
        match action {
            RootAction::Posts(action) => RootState {
                posts: PostsReducer::reduce(posts, action),
                users,
            },
            RootAction::Users(action) => RootState {
                posts,
                users: UsersReducer::reduce(users, action),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::mvi::LoadStatus;

    #[test]
    fn users_action_leaves_posts_untouched() {
        let state = RootState::default();
        let before = state.posts.clone();
        let state = RootReducer::reduce(
            state,
            UsersAction::FetchFulfilled {
                users: vec![User {
                    id: 1,
                    name: "Leanne Graham".to_string(),
                }],
            }
            .into(),
        );
        assert_eq!(state.posts, before);
        assert_eq!(state.users.status, LoadStatus::Succeeded);
    }

    #[test]
    fn posts_action_leaves_users_untouched() {
        let state = RootReducer::reduce(RootState::default(), PostsAction::FetchPending.into());
        assert_eq!(state.posts.status, LoadStatus::Loading);
        assert_eq!(state.users, UsersState::default());
    }
}
