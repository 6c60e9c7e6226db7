//! State for the posts slice.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{Post, PostId};
use crate::mvi::{LoadStatus, SliceState};

/// How a fetch-all response is folded into a collection that may have
/// changed while the request was in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPolicy {
    /// The response replaces the collection wholesale. A slow fetch can
    /// resurrect a post deleted after it was sent.
    Replace,
    /// Responses older than the newest applied fetch are dropped, and local
    /// changes made after the fetch was sent are replayed over the response.
    #[default]
    Reconcile,
}

/// Posts slice root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    /// Insertion order, not sorted by id.
    pub posts: Vec<Post>,
    pub status: LoadStatus,
    pub error: Option<String>,
    policy: FetchPolicy,
    /// Bumped by every committed local change.
    revision: u64,
    /// Last sequence number handed to a fetch.
    fetch_seq: u64,
    /// Sequence number of the newest fetch that was applied.
    applied_fetch: u64,
    /// Outstanding fetches: sequence number -> revision when sent.
    pending_fetches: BTreeMap<u64, u64>,
    /// Local changes recorded while at least one fetch is outstanding.
    changes: Vec<LocalChange>,
    /// Posts with an update or delete in flight: post id -> claim token.
    claims: BTreeMap<PostId, u64>,
    /// Posts whose id was picked locally and never appeared in a fetch.
    unconfirmed: BTreeSet<PostId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LocalChange {
    pub(super) revision: u64,
    pub(super) id: PostId,
}

impl SliceState for PostsState {}

impl PostsState {
    pub fn new(policy: FetchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Seed the collection, e.g. for tests or a warm start.
    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Next free id: one past the largest id held, found without reordering
    /// the collection.
    pub fn next_id(&self) -> PostId {
        self.posts.iter().map(|post| post.id).max().map_or(1, |max| max + 1)
    }

    /// Sequence number of the most recently sent fetch-all.
    pub fn latest_fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    pub fn is_fetching(&self) -> bool {
        !self.pending_fetches.is_empty()
    }

    /// Claim token currently holding `id`, if an update or delete is in flight.
    pub fn claim_holder(&self, id: PostId) -> Option<u64> {
        self.claims.get(&id).copied()
    }

    /// True for a post added or created here that no fetch has returned.
    pub fn is_unconfirmed(&self, id: PostId) -> bool {
        self.unconfirmed.contains(&id)
    }

    pub(super) fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.pending_fetches.insert(self.fetch_seq, self.revision);
        self.fetch_seq
    }

    /// Retire a fetch. Returns the posts changed locally since it was sent.
    pub(super) fn finish_fetch(&mut self, seq: u64) -> Vec<PostId> {
        let changed = match self.pending_fetches.remove(&seq) {
            Some(started_at) => self.changed_since(started_at),
            None => Vec::new(),
        };
        self.prune_changes();
        changed
    }

    /// True when a newer fetch has already been applied.
    pub(super) fn is_superseded(&self, seq: u64) -> bool {
        seq < self.applied_fetch
    }

    pub(super) fn mark_applied(&mut self, seq: u64) {
        self.applied_fetch = self.applied_fetch.max(seq);
    }

    /// Post ids changed after `revision`, first change first, without repeats.
    fn changed_since(&self, revision: u64) -> Vec<PostId> {
        let mut ids = Vec::new();
        for change in self.changes.iter().filter(|c| c.revision > revision) {
            if !ids.contains(&change.id) {
                ids.push(change.id);
            }
        }
        ids
    }

    /// Record a committed local change to `id`.
    pub(super) fn touch(&mut self, id: PostId) {
        self.revision += 1;
        if self.is_fetching() {
            self.changes.push(LocalChange {
                revision: self.revision,
                id,
            });
        }
    }

    pub(super) fn claim(&mut self, id: PostId, claim: u64) {
        self.claims.entry(id).or_insert(claim);
    }

    pub(super) fn release(&mut self, id: PostId) {
        self.claims.remove(&id);
    }

    pub(super) fn mark_unconfirmed(&mut self, id: PostId) {
        self.unconfirmed.insert(id);
    }

    pub(super) fn forget_unconfirmed(&mut self, id: PostId) {
        self.unconfirmed.remove(&id);
    }

    pub(super) fn set_unconfirmed(&mut self, ids: BTreeSet<PostId>) {
        self.unconfirmed = ids;
    }

    fn prune_changes(&mut self) {
        match self.pending_fetches.values().min().copied() {
            Some(oldest) => self.changes.retain(|c| c.revision > oldest),
            None => self.changes.clear(),
        }
    }
}
