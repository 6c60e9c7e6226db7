//! Reducer for the posts slice.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{Post, PostId, Reactions, RemotePost, UpdatedPost};
use crate::mvi::{LoadStatus, Reducer};

use super::action::PostsAction;
use super::state::{FetchPolicy, PostsState};

/// Reducer for posts state transitions.
///
/// Pure apart from logging: network calls and clock reads happen in the
/// store before the action is dispatched.
pub struct PostsReducer;

impl Reducer for PostsReducer {
    type State = PostsState;
    type Action = PostsAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            PostsAction::PostAdded {
                title,
                body,
                user_id,
                date,
            } => {
                let id = state.next_id();
                state.posts.push(Post {
                    id,
                    user_id,
                    title,
                    body,
                    date,
                    reactions: Reactions::default(),
                });
                state.mark_unconfirmed(id);
                state.touch(id);
                state
            }

            PostsAction::ReactionAdded { post_id, reaction } => {
                let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) else {
                    return state;
                };
                post.reactions.increment(reaction);
                state.touch(post_id);
                state
            }

            PostsAction::FetchPending => {
                state.begin_fetch();
                state.status = LoadStatus::Loading;
                state
            }

            PostsAction::FetchFulfilled { seq, posts, now } => {
                let changed = state.finish_fetch(seq);
                let reconcile = state.policy() == FetchPolicy::Reconcile;

                if reconcile && state.is_superseded(seq) {
                    tracing::warn!(seq, "Discarding posts response older than the applied one");
                    return state;
                }

                let mut loaded = ingest(posts, now);
                let unconfirmed = if reconcile {
                    replay_local_changes(&state, &changed, &mut loaded)
                } else {
                    BTreeSet::new()
                };

                state.posts = loaded;
                state.set_unconfirmed(unconfirmed);
                state.mark_applied(seq);
                state.status = LoadStatus::Succeeded;
                state.error = None;
                state
            }

            PostsAction::FetchRejected { seq, error } => {
                state.finish_fetch(seq);
                if state.policy() == FetchPolicy::Reconcile && state.is_superseded(seq) {
                    tracing::debug!(seq, %error, "Ignoring failure of a superseded posts fetch");
                    return state;
                }
                state.status = LoadStatus::Failed;
                state.error = Some(error);
                state
            }

            PostsAction::CreateFulfilled { post, now } => {
                // The API hands out the same id for every create
                let id = state.next_id();
                state.posts.push(Post {
                    id,
                    user_id: post.user_id,
                    title: post.title,
                    body: post.body,
                    date: now,
                    reactions: Reactions::default(),
                });
                state.mark_unconfirmed(id);
                state.touch(id);
                state
            }

            PostsAction::MutationClaimed { post_id, claim } => {
                state.claim(post_id, claim);
                state
            }

            PostsAction::UpdateFulfilled {
                post_id,
                payload,
                now,
            } => {
                state.release(post_id);
                let Some(id) = payload.id else {
                    tracing::warn!(post_id, ?payload, "Update could not complete: response has no id");
                    return state;
                };
                let Some(merged) = merge_update(state.get(id), id, payload, now) else {
                    tracing::warn!(post_id = id, "Update could not complete: post is gone and response is incomplete");
                    return state;
                };
                match state.posts.iter_mut().find(|p| p.id == id) {
                    Some(slot) => *slot = merged,
                    None => state.posts.push(merged),
                }
                state.touch(id);
                state
            }

            PostsAction::UpdateRejected { post_id } => {
                state.release(post_id);
                state
            }

            PostsAction::DeleteFulfilled { post_id } => {
                state.release(post_id);
                state.posts.retain(|p| p.id != post_id);
                state.forget_unconfirmed(post_id);
                state.touch(post_id);
                state
            }

            PostsAction::DeleteRejected { post_id } => {
                state.release(post_id);
                state
            }
        }
    }
}

/// Turn a fetch-all response into store posts: the first post is dated one
/// minute before `now`, each following one a minute earlier, all reactions
/// zeroed.
fn ingest(posts: Vec<RemotePost>, now: DateTime<Utc>) -> Vec<Post> {
    let mut minutes = 0;
    posts
        .into_iter()
        .filter_map(|remote| {
            let Some(id) = remote.id else {
                tracing::warn!(title = %remote.title, "Skipping fetched post without an id");
                return None;
            };
            minutes += 1;
            Some(Post {
                id,
                user_id: remote.user_id,
                title: remote.title,
                body: remote.body,
                date: now - TimeDelta::minutes(minutes),
                reactions: Reactions::default(),
            })
        })
        .collect()
}

/// Re-apply locally changed posts on top of a fetched list: posts still held
/// are upserted, posts no longer held are removed.
///
/// A replayed post whose id was picked locally may share it with an unrelated
/// server post. Such a post moves to an id above both lists instead of
/// overwriting the server's. Returns the unconfirmed ids left in `loaded`.
fn replay_local_changes(
    state: &PostsState,
    changed: &[PostId],
    loaded: &mut Vec<Post>,
) -> BTreeSet<PostId> {
    let mut unconfirmed = BTreeSet::new();
    for &id in changed {
        let Some(current) = state.get(id) else {
            loaded.retain(|p| p.id != id);
            continue;
        };
        let local_only = state.is_unconfirmed(id);
        match loaded.iter().position(|p| p.id == id) {
            Some(index) if !local_only => loaded[index] = current.clone(),
            Some(_) => {
                let fresh = loaded
                    .iter()
                    .chain(&state.posts)
                    .map(|p| p.id)
                    .max()
                    .map_or(1, |max| max + 1);
                tracing::warn!(old_id = id, new_id = fresh, "Local post collides with a fetched one, renumbering");
                loaded.push(Post {
                    id: fresh,
                    ..current.clone()
                });
                unconfirmed.insert(fresh);
            }
            None => {
                loaded.push(current.clone());
                if local_only {
                    unconfirmed.insert(id);
                }
            }
        }
    }
    unconfirmed
}

/// Build the stored post from an update echo, back-filling anything the
/// response left out from the post currently held. With nothing held, the
/// echo alone has to carry a title, a body and an author.
fn merge_update(
    existing: Option<&Post>,
    id: PostId,
    payload: UpdatedPost,
    now: DateTime<Utc>,
) -> Option<Post> {
    let Some(existing) = existing else {
        return Some(Post {
            id,
            user_id: payload.user_id.filter(|user_id| *user_id != 0)?,
            title: payload.title.filter(|title| !title.trim().is_empty())?,
            body: payload.body.filter(|body| !body.trim().is_empty())?,
            date: now,
            reactions: payload.reactions.unwrap_or_default(),
        });
    };

    Some(Post {
        id,
        user_id: payload.user_id.unwrap_or(existing.user_id),
        title: payload.title.unwrap_or_else(|| existing.title.clone()),
        body: payload.body.unwrap_or_else(|| existing.body.clone()),
        date: now,
        reactions: payload.reactions.unwrap_or(existing.reactions),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReactionKind;

    fn remote(id: u64) -> RemotePost {
        RemotePost {
            id: Some(id),
            user_id: 1,
            title: format!("remote {}", id),
            body: "body".to_string(),
        }
    }

    fn fetched(state: PostsState, ids: &[u64], now: DateTime<Utc>) -> PostsState {
        let state = PostsReducer::reduce(state, PostsAction::FetchPending);
        let seq = state.latest_fetch_seq();
        PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq,
                posts: ids.iter().copied().map(remote).collect(),
                now,
            },
        )
    }

    #[test]
    fn fetch_skips_posts_without_id() {
        let now = Utc::now();
        let mut posts = vec![remote(1), remote(2)];
        posts[0].id = None;
        let state = PostsReducer::reduce(PostsState::default(), PostsAction::FetchPending);
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 1,
                posts,
                now,
            },
        );
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].id, 2);
        assert_eq!(state.posts[0].date, now - TimeDelta::minutes(1));
    }

    #[test]
    fn reaction_during_fetch_survives_reconcile() {
        let now = Utc::now();
        let state = fetched(PostsState::default(), &[1, 2], now);

        let state = PostsReducer::reduce(state, PostsAction::FetchPending);
        let seq = state.latest_fetch_seq();
        let state = PostsReducer::reduce(
            state,
            PostsAction::ReactionAdded {
                post_id: 2,
                reaction: ReactionKind::Heart,
            },
        );
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq,
                posts: vec![remote(1), remote(2)],
                now,
            },
        );

        assert_eq!(state.get(2).unwrap().reactions.heart, 1);
    }

    #[test]
    fn older_fetch_is_dropped_after_newer_one_applies() {
        let now = Utc::now();
        let state = PostsReducer::reduce(PostsState::default(), PostsAction::FetchPending);
        let state = PostsReducer::reduce(state, PostsAction::FetchPending);
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 2,
                posts: vec![remote(1), remote(2)],
                now,
            },
        );
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 1,
                posts: vec![remote(9)],
                now,
            },
        );

        let ids: Vec<u64> = state.posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!state.is_fetching());
    }

    #[test]
    fn older_fetch_still_applies_under_replace() {
        let now = Utc::now();
        let state = PostsReducer::reduce(
            PostsState::new(FetchPolicy::Replace),
            PostsAction::FetchPending,
        );
        let state = PostsReducer::reduce(state, PostsAction::FetchPending);
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 2,
                posts: vec![remote(1)],
                now,
            },
        );
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 1,
                posts: vec![remote(9)],
                now,
            },
        );

        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].id, 9);
    }

    #[test]
    fn superseded_failure_does_not_flag_failed() {
        let now = Utc::now();
        let state = PostsReducer::reduce(PostsState::default(), PostsAction::FetchPending);
        let state = PostsReducer::reduce(state, PostsAction::FetchPending);
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchFulfilled {
                seq: 2,
                posts: vec![remote(1)],
                now,
            },
        );
        let state = PostsReducer::reduce(
            state,
            PostsAction::FetchRejected {
                seq: 1,
                error: "boom".to_string(),
            },
        );
        assert_eq!(state.status, LoadStatus::Succeeded);
        assert!(state.error.is_none());
    }

    #[test]
    fn merge_update_backfills_from_existing() {
        let now = Utc::now();
        let mut reactions = Reactions::default();
        reactions.increment(ReactionKind::Wow);
        let existing = Post {
            id: 4,
            user_id: 2,
            title: "old".to_string(),
            body: "old body".to_string(),
            date: now - TimeDelta::hours(1),
            reactions,
        };
        let payload = UpdatedPost {
            id: Some(4),
            title: Some("new".to_string()),
            ..UpdatedPost::default()
        };

        let merged = merge_update(Some(&existing), 4, payload, now).unwrap();
        assert_eq!(merged.title, "new");
        assert_eq!(merged.body, "old body");
        assert_eq!(merged.user_id, 2);
        assert_eq!(merged.reactions.wow, 1);
        assert_eq!(merged.date, now);
    }

    #[test]
    fn merge_update_without_existing_requires_every_field() {
        let now = Utc::now();
        let partial = UpdatedPost {
            id: Some(9),
            title: Some("t".to_string()),
            body: Some("b".to_string()),
            ..UpdatedPost::default()
        };
        assert!(merge_update(None, 9, partial.clone(), now).is_none());

        let blank_title = UpdatedPost {
            user_id: Some(1),
            title: Some("  ".to_string()),
            ..partial.clone()
        };
        assert!(merge_update(None, 9, blank_title, now).is_none());

        let complete = UpdatedPost {
            user_id: Some(1),
            ..partial
        };
        let merged = merge_update(None, 9, complete, now).unwrap();
        assert_eq!(merged.user_id, 1);
        assert_eq!(merged.reactions, Reactions::default());
    }
}
