//! Domain entities and the wire payloads exchanged with the posts API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type PostId = u64;
pub type UserId = u64;

/// The closed set of reactions a post can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    ThumbsUp,
    Wow,
    Heart,
    Rocket,
    Coffee,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::ThumbsUp,
        ReactionKind::Wow,
        ReactionKind::Heart,
        ReactionKind::Rocket,
        ReactionKind::Coffee,
    ];

    /// Name used on the wire and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "thumbsUp",
            ReactionKind::Wow => "wow",
            ReactionKind::Heart => "heart",
            ReactionKind::Rocket => "rocket",
            ReactionKind::Coffee => "coffee",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "👍",
            ReactionKind::Wow => "😮",
            ReactionKind::Heart => "❤️",
            ReactionKind::Rocket => "🚀",
            ReactionKind::Coffee => "☕",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ReactionKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown reaction '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Per-kind reaction counters. Every field is always present, so a post
/// can never be missing a counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactions {
    #[serde(default)]
    pub thumbs_up: u32,
    #[serde(default)]
    pub wow: u32,
    #[serde(default)]
    pub heart: u32,
    #[serde(default)]
    pub rocket: u32,
    #[serde(default)]
    pub coffee: u32,
}

impl Reactions {
    pub fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up,
            ReactionKind::Wow => self.wow,
            ReactionKind::Heart => self.heart,
            ReactionKind::Rocket => self.rocket,
            ReactionKind::Coffee => self.coffee,
        }
    }

    /// Bump one counter by exactly one. Saturates instead of wrapping.
    pub fn increment(&mut self, kind: ReactionKind) {
        let counter = match kind {
            ReactionKind::ThumbsUp => &mut self.thumbs_up,
            ReactionKind::Wow => &mut self.wow,
            ReactionKind::Heart => &mut self.heart,
            ReactionKind::Rocket => &mut self.rocket,
            ReactionKind::Coffee => &mut self.coffee,
        };
        *counter = counter.saturating_add(1);
    }
}

/// A post as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    /// Client-assigned; the API has no notion of a post date.
    pub date: DateTime<Utc>,
    pub reactions: Reactions,
}

/// A post author. Extra fields returned by the API are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A post as returned by `GET /posts` and `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(deserialize_with = "lenient_user_id")]
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: UserId,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }

    /// A post can only be saved with a title, a body and an author.
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.body, self.user_id)
    }
}

/// Body of an update request: the full post including its current reactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub user_id: UserId,
    pub reactions: Reactions,
}

impl PostUpdate {
    /// Start an edit from a stored post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            user_id: post.user_id,
            reactions: post.reactions,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.body, self.user_id)
    }
}

/// Whatever the API echoed back for an update. The mock backend does not
/// always return a post shape, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedPost {
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(default, deserialize_with = "lenient_optional_user_id")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub reactions: Option<Reactions>,
}

impl From<PostUpdate> for UpdatedPost {
    fn from(update: PostUpdate) -> Self {
        Self {
            id: Some(update.id),
            user_id: Some(update.user_id),
            title: Some(update.title),
            body: Some(update.body),
            reactions: Some(update.reactions),
        }
    }
}

fn validate_fields(title: &str, body: &str, user_id: UserId) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if body.trim().is_empty() {
        return Err("body must not be empty".to_string());
    }
    if user_id == 0 {
        return Err("an author must be selected".to_string());
    }
    Ok(())
}

/// The API echoes `userId` back in whatever form it was sent, so accept
/// numbers as well as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(UserId),
    Text(String),
}

impl NumberOrString {
    fn into_user_id<E: serde::de::Error>(self) -> Result<UserId, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid userId '{}'", s))),
        }
    }
}

fn lenient_user_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_user_id()
}

fn lenient_optional_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_user_id)
        .transpose()
}
