use crate::models::{User, UserId};
use crate::mvi::{LoadStatus, SliceState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    pub users: Vec<User>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl SliceState for UsersState {}

impl UsersState {
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }
}
