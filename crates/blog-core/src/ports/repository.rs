use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId, TagMetric};
use crate::error::RepoError;
use crate::query::{ListPlan, PostFilter, TagPipeline};

/// Storage port for the `posts` collection.
///
/// Implementations translate plans into native queries and report failures as
/// [`RepoError`]; classification into the error taxonomy happens in
/// [`crate::service::PostGateway`].
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post and return the identity the store assigned.
    async fn insert(&self, post: NewPost) -> Result<PostId, RepoError>;

    /// Find a post by its identity.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Atomically apply `changes` and return the post-update document, or
    /// `None` if no document has this identity.
    async fn find_one_and_update(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError>;

    /// Delete by identity, returning how many documents were removed.
    async fn delete_by_id(&self, id: PostId) -> Result<u64, RepoError>;

    /// Count every post matching `filter`, ignoring pagination.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Fetch the sorted page window described by `plan`.
    async fn find_page(&self, plan: &ListPlan) -> Result<Vec<Post>, RepoError>;

    /// Run the tag metrics aggregation.
    async fn aggregate_tags(&self, pipeline: &TagPipeline) -> Result<Vec<TagMetric>, RepoError>;
}
