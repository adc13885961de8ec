use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque 12-byte post identity, rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId([u8; 12]);

impl PostId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Why an identity string was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParsePostIdError {
    #[error("expected 24 hex characters, got {0}")]
    Length(usize),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for PostId {
    type Err = ParsePostIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(ParsePostIdError::Length(s.len()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Post entity - a persisted blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-editable fields of a post, used by create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
    /// Explicit publication instant. When absent the server stamps one on the
    /// first transition into the published state.
    pub published_at: Option<DateTime<Utc>>,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Document to insert: stamps `created_at` and, for drafts created already
    /// published, `published_at`.
    pub fn into_new_post(self, now: DateTime<Utc>) -> NewPost {
        let published_at = match (self.published, self.published_at) {
            (_, Some(explicit)) => Some(explicit),
            (true, None) => Some(now),
            (false, None) => None,
        };

        NewPost {
            title: self.title,
            author: self.author,
            content: self.content,
            tags: self.tags,
            published: self.published,
            published_at,
            created_at: now,
        }
    }

    /// Field set for an update against a post whose stored `published` flag is
    /// `was_published`.
    ///
    /// An explicit `published_at` always wins. Otherwise it is stamped only on
    /// a false to true transition and left untouched in every other case.
    pub fn into_changes(self, was_published: bool, now: DateTime<Utc>) -> PostChanges {
        let published_at = match self.published_at {
            Some(explicit) => Some(explicit),
            None if !was_published && self.published => Some(now),
            None => None,
        };

        PostChanges {
            title: self.title,
            author: self.author,
            content: self.content,
            tags: self.tags,
            published: self.published,
            published_at,
            updated_at: now,
        }
    }
}

/// A post ready for insertion. The store assigns the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            author: self.author,
            content: self.content,
            tags: self.tags,
            published: self.published,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

/// Field set applied by one atomic find-and-update.
///
/// `published_at` of `None` leaves the stored value as it is.
#[derive(Debug, Clone, PartialEq)]
pub struct PostChanges {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PostChanges {
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.author = self.author;
        post.content = self.content;
        post.tags = self.tags;
        post.published = self.published;
        if let Some(published_at) = self.published_at {
            post.published_at = Some(published_at);
        }
        post.updated_at = Some(self.updated_at);
    }
}

/// Number of posts carrying a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMetric {
    pub tag: String,
    pub count: i64,
}
