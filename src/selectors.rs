//! Read-only projections over committed state.
//!
//! Nothing here caches: every call recomputes from the state it is given.

use crate::models::{Post, PostId, User, UserId};
use crate::mvi::LoadStatus;
use crate::store::RootState;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";

pub fn select_all_posts(state: &RootState) -> &[Post] {
    &state.posts.posts
}

pub fn select_post_by_id(state: &RootState, id: PostId) -> Option<&Post> {
    state.posts.get(id)
}

pub fn select_posts_status(state: &RootState) -> LoadStatus {
    state.posts.status
}

pub fn select_posts_error(state: &RootState) -> Option<&str> {
    state.posts.error.as_deref()
}

pub fn select_all_users(state: &RootState) -> &[User] {
    &state.users.users
}

pub fn select_user_by_id(state: &RootState, id: UserId) -> Option<&User> {
    state.users.get(id)
}

pub fn select_users_status(state: &RootState) -> LoadStatus {
    state.users.status
}

pub fn select_users_error(state: &RootState) -> Option<&str> {
    state.users.error.as_deref()
}

/// Posts written by `user_id`, in collection order.
pub fn select_posts_by_user(state: &RootState, user_id: UserId) -> Vec<&Post> {
    state
        .posts
        .posts
        .iter()
        .filter(|post| post.user_id == user_id)
        .collect()
}

/// Display name of a post's author, or [`UNKNOWN_AUTHOR`] if the user is not loaded.
pub fn select_post_author<'a>(state: &'a RootState, post: &Post) -> &'a str {
    select_user_by_id(state, post.user_id).map_or(UNKNOWN_AUTHOR, |user| user.name.as_str())
}
