//! Actions for the posts slice.

use chrono::{DateTime, Utc};

use crate::models::{PostId, ReactionKind, RemotePost, UpdatedPost, UserId};
use crate::mvi::Action;

/// Actions that can be dispatched to the posts reducer.
///
/// Request-backed operations show up as their pending/fulfilled/rejected
/// phases. Create has no pending or rejected phase because a failed create
/// never touches state.
#[derive(Debug, Clone)]
pub enum PostsAction {
    /// A post composed locally, without a round trip.
    PostAdded {
        title: String,
        body: String,
        user_id: UserId,
        date: DateTime<Utc>,
    },

    ReactionAdded {
        post_id: PostId,
        reaction: ReactionKind,
    },

    /// A fetch-all was sent. The reducer assigns it the next sequence number.
    FetchPending,

    FetchFulfilled {
        seq: u64,
        posts: Vec<RemotePost>,
        now: DateTime<Utc>,
    },

    FetchRejected {
        seq: u64,
        error: String,
    },

    CreateFulfilled {
        post: RemotePost,
        now: DateTime<Utc>,
    },

    /// Reserve a post for an update or delete. A post keeps its first claim
    /// until that request settles.
    MutationClaimed {
        post_id: PostId,
        claim: u64,
    },

    UpdateFulfilled {
        post_id: PostId,
        payload: UpdatedPost,
        now: DateTime<Utc>,
    },

    UpdateRejected {
        post_id: PostId,
    },

    DeleteFulfilled {
        post_id: PostId,
    },

    DeleteRejected {
        post_id: PostId,
    },
}

impl Action for PostsAction {}
