//! Domain entities - the core business objects.

mod post;

pub use post::{NewPost, ParsePostIdError, Post, PostChanges, PostDraft, PostId, TagMetric};
