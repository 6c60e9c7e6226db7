use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};

use crate::api::{ApiClient, ApiError};
use crate::config::{StoreConfig, UpdateFailurePolicy};
use crate::models::{NewPost, Post, PostId, PostUpdate, ReactionKind, UserId};
use crate::posts::PostsAction;
use crate::users::UsersAction;

use super::error::StoreError;
use super::root::{RootAction, RootState};
use super::server::{Snapshot, StoreCommand, StoreServer};

/// What an update ended up doing to local state.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The server accepted the update; the stored post is its echo.
    Applied(Post),
    /// The request failed and the submitted post was applied anyway.
    Fallback { post: Post, error: ApiError },
    /// The server's answer could not be merged; nothing was changed.
    Abandoned,
}

/// Cloneable handle to the store actor.
///
/// Reads are synchronous snapshots. Writes go through named operations that
/// dispatch actions to the actor.
#[derive(Clone)]
pub struct Store {
    sender: mpsc::Sender<StoreCommand>,
    snapshots: watch::Receiver<Snapshot>,
    api: ApiClient,
    update_failure: UpdateFailurePolicy,
    next_claim: Arc<AtomicU64>,
}

impl Store {
    /// Build a handle and the actor that backs it. The caller runs the actor.
    pub fn new(api: ApiClient, config: &StoreConfig) -> (Self, StoreServer) {
        let (sender, receiver) = mpsc::channel(config.command_buffer);
        let (server, snapshots) =
            StoreServer::new(receiver, RootState::new(config.fetch_policy));
        let store = Self {
            sender,
            snapshots,
            api,
            update_failure: config.update_failure,
            next_claim: Arc::new(AtomicU64::new(0)),
        };
        (store, server)
    }

    /// Build a handle and run its actor on the current tokio runtime.
    pub fn spawn(api: ApiClient, config: &StoreConfig) -> Self {
        let (store, server) = Self::new(api, config);
        tokio::spawn(server.run());
        store
    }

    /// Latest committed state.
    pub fn state(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every committed action.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Fold one action into state and return the state right after it.
    pub async fn dispatch(&self, action: impl Into<RootAction>) -> Result<Snapshot, StoreError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(StoreCommand::Dispatch {
                action: action.into(),
                respond_to,
            })
            .await
            .map_err(|_| StoreError::Disconnected)?;
        receiver.await.map_err(|_| StoreError::Disconnected)
    }

    /// Startup load: posts and users are fetched concurrently and
    /// independently. Failures are recorded in state and also returned.
    pub async fn init(&self) -> (Result<usize, StoreError>, Result<usize, StoreError>) {
        let (posts, users) = tokio::join!(self.fetch_posts(), self.fetch_users());
        match (&posts, &users) {
            (Ok(posts), Ok(users)) => tracing::info!(posts, users, "Initial load complete"),
            _ => tracing::warn!(
                posts_ok = posts.is_ok(),
                users_ok = users.is_ok(),
                "Initial load incomplete"
            ),
        }
        (posts, users)
    }

    /// Replace the post collection with the server's. Returns how many posts
    /// the server sent.
    pub async fn fetch_posts(&self) -> Result<usize, StoreError> {
        let snapshot = self.dispatch(PostsAction::FetchPending).await?;
        let seq = snapshot.posts.latest_fetch_seq();

        match self.api.list_posts().await {
            Ok(posts) => {
                let count = posts.len();
                self.dispatch(PostsAction::FetchFulfilled {
                    seq,
                    posts,
                    now: Utc::now(),
                })
                .await?;
                tracing::debug!(seq, count, "Posts fetched");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Failed to fetch posts");
                self.dispatch(PostsAction::FetchRejected {
                    seq,
                    error: e.to_string(),
                })
                .await?;
                Err(e.into())
            }
        }
    }

    pub async fn fetch_users(&self) -> Result<usize, StoreError> {
        self.dispatch(UsersAction::FetchPending).await?;

        match self.api.list_users().await {
            Ok(users) => {
                let count = users.len();
                self.dispatch(UsersAction::FetchFulfilled { users }).await?;
                tracing::debug!(count, "Users fetched");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch users");
                self.dispatch(UsersAction::FetchRejected {
                    error: e.to_string(),
                })
                .await?;
                Err(e.into())
            }
        }
    }

    /// Add a post without contacting the server.
    pub async fn add_post_local(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        user_id: UserId,
    ) -> Result<Post, StoreError> {
        let snapshot = self
            .dispatch(PostsAction::PostAdded {
                title: title.into(),
                body: body.into(),
                user_id,
                date: Utc::now(),
            })
            .await?;
        last_post(&snapshot)
    }

    /// Bump one reaction counter. Unknown posts are ignored.
    pub async fn add_reaction(
        &self,
        post_id: PostId,
        reaction: ReactionKind,
    ) -> Result<(), StoreError> {
        self.dispatch(PostsAction::ReactionAdded { post_id, reaction })
            .await?;
        Ok(())
    }

    /// Create a post on the server and append it locally under a fresh id.
    /// A failed request leaves state untouched.
    pub async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        post.validate().map_err(StoreError::Validation)?;

        let echo = match self.api.create_post(&post).await {
            Ok(echo) => echo,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create post");
                return Err(e.into());
            }
        };

        let snapshot = self
            .dispatch(PostsAction::CreateFulfilled {
                post: echo,
                now: Utc::now(),
            })
            .await?;
        let created = last_post(&snapshot)?;
        tracing::info!(post_id = created.id, "Post created");
        Ok(created)
    }

    /// Send an edit. See [`UpdateFailurePolicy`] for what a failed request does.
    ///
    /// The request runs on its own task, so dropping the returned future does
    /// not leave the post claimed.
    pub async fn update_post(&self, update: PostUpdate) -> Result<UpdateOutcome, StoreError> {
        update.validate().map_err(StoreError::Validation)?;
        let store = self.clone();
        run_detached(async move {
            store.claim(update.id).await?;
            store.send_update(update).await
        })
        .await
    }

    /// Delete on the server, then locally. Any failure leaves state untouched.
    /// Like [`Store::update_post`], the request outlives a dropped caller.
    pub async fn delete_post(&self, post_id: PostId) -> Result<(), StoreError> {
        let store = self.clone();
        run_detached(async move {
            store.claim(post_id).await?;
            store.send_delete(post_id).await
        })
        .await
    }

    async fn send_update(&self, update: PostUpdate) -> Result<UpdateOutcome, StoreError> {
        let post_id = update.id;
        match self.api.update_post(&update).await {
            Ok(payload) => {
                let echoed_id = payload.id;
                let snapshot = self
                    .dispatch(PostsAction::UpdateFulfilled {
                        post_id,
                        payload,
                        now: Utc::now(),
                    })
                    .await?;
                let merged = echoed_id.and_then(|id| snapshot.posts.get(id).cloned());
                Ok(merged.map_or(UpdateOutcome::Abandoned, UpdateOutcome::Applied))
            }
            Err(error) => match self.update_failure {
                UpdateFailurePolicy::Optimistic => {
                    tracing::warn!(post_id, error = %error, "Update failed, applying submitted post locally");
                    let snapshot = self
                        .dispatch(PostsAction::UpdateFulfilled {
                            post_id,
                            payload: update.into(),
                            now: Utc::now(),
                        })
                        .await?;
                    let post = stored_post(&snapshot, post_id)?;
                    Ok(UpdateOutcome::Fallback { post, error })
                }
                UpdateFailurePolicy::Reject => {
                    tracing::warn!(post_id, error = %error, "Update failed");
                    self.dispatch(PostsAction::UpdateRejected { post_id }).await?;
                    Err(error.into())
                }
            },
        }
    }

    async fn send_delete(&self, post_id: PostId) -> Result<(), StoreError> {
        match self.api.delete_post(post_id).await {
            Ok(()) => {
                self.dispatch(PostsAction::DeleteFulfilled { post_id }).await?;
                tracing::info!(post_id, "Post deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(post_id, error = %e, "Failed to delete post");
                self.dispatch(PostsAction::DeleteRejected { post_id }).await?;
                Err(e.into())
            }
        }
    }

    /// Reserve `post_id` for this caller's update or delete.
    async fn claim(&self, post_id: PostId) -> Result<(), StoreError> {
        let claim = self.next_claim.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = self
            .dispatch(PostsAction::MutationClaimed { post_id, claim })
            .await?;
        if snapshot.posts.claim_holder(post_id) != Some(claim) {
            tracing::warn!(post_id, "Post already has a request in flight");
            return Err(StoreError::PostBusy { id: post_id });
        }
        Ok(())
    }
}

/// Drive a claim-holding request to completion on its own task. The claim is
/// released by the request's final dispatch, which must run even if the
/// caller stops polling.
async fn run_detached<T, F>(request: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, StoreError>> + Send + 'static,
{
    tokio::spawn(request)
        .await
        .map_err(|e| StoreError::Internal(format!("request task failed: {}", e)))?
}

fn last_post(snapshot: &RootState) -> Result<Post, StoreError> {
    snapshot
        .posts
        .posts
        .last()
        .cloned()
        .ok_or_else(|| StoreError::Internal("post collection empty after insert".to_string()))
}

fn stored_post(snapshot: &RootState, id: PostId) -> Result<Post, StoreError> {
    snapshot
        .posts
        .get(id)
        .cloned()
        .ok_or_else(|| StoreError::Internal(format!("post {} missing after update", id)))
}
