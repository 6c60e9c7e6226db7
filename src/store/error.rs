use thiserror::Error;

use crate::api::ApiError;
use crate::models::PostId;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Rejected before anything was sent
    #[error("Invalid post: {0}")]
    Validation(String),

    /// Another update or delete for the same post has not settled yet
    #[error("Post {id} already has an update or delete in flight")]
    PostBusy { id: PostId },

    /// The store actor has stopped
    #[error("Store is no longer running")]
    Disconnected,

    #[error("Internal error: {0}")]
    Internal(String),
}
