use crate::models::User;
use crate::mvi::Action;

#[derive(Debug, Clone)]
pub enum UsersAction {
    FetchPending,
    FetchFulfilled { users: Vec<User> },
    FetchRejected { error: String },
}

impl Action for UsersAction {}
