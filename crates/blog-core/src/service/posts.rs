//! Post store gateway - the only entry point for reads and writes on posts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::{Post, PostDraft, PostId, TagMetric};
use crate::error::{ErrorKind, PostError, RepoError, WrapErr};
use crate::ports::PostStore;
use crate::query::{ListPlan, ListPostsParams, PostPage, PublishedFilter, TagPipeline};

/// Upper bound for a single gateway operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Post gateway over a [`PostStore`].
///
/// Stamps server-side timestamps, enforces the publish transition rule,
/// bounds every store call with a timeout and classifies every failure into
/// an [`ErrorKind`]. Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct PostGateway {
    store: Arc<dyn PostStore>,
    timeout: Duration,
}

impl PostGateway {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert a new post and return its identity.
    pub async fn create(&self, draft: PostDraft) -> Result<PostId, PostError> {
        let post = draft.into_new_post(Utc::now());
        let id = self.bounded("insert post", self.store.insert(post)).await?;

        tracing::debug!(post_id = %id, "Post created");
        Ok(id)
    }

    /// Fetch a post by its textual identity.
    pub async fn get_by_id(&self, id: &str) -> Result<Post, PostError> {
        let oid = parse_id(id)?;

        self.bounded("find post", self.store.find_by_id(oid))
            .await?
            .ok_or_else(|| PostError::not_found("post not found"))
    }

    /// Replace the editable fields of a post and return the updated document.
    pub async fn update_by_id(&self, id: &str, draft: PostDraft) -> Result<Post, PostError> {
        let current = self.get_by_id(id).await?;
        let changes = draft.into_changes(current.published, Utc::now());

        if changes.published_at.is_some() && !current.published {
            tracing::debug!(post_id = %current.id, "Post transitions to published");
        }

        self.bounded(
            "find and update post",
            self.store.find_one_and_update(current.id, changes),
        )
        .await?
        .ok_or_else(|| PostError::not_found("post not found after update"))
    }

    /// Physically delete a post.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), PostError> {
        let oid = parse_id(id)?;

        let deleted = self.bounded("delete post", self.store.delete_by_id(oid)).await?;
        if deleted == 0 {
            return Err(PostError::not_found("post not found"));
        }

        tracing::debug!(post_id = %oid, "Post deleted");
        Ok(())
    }

    /// Filtered, sorted and paginated listing.
    pub async fn list(&self, params: &ListPostsParams) -> Result<PostPage, PostError> {
        let plan = ListPlan::build(params);
        tracing::debug!(
            page = plan.page,
            limit = plan.limit,
            sort = ?plan.sort,
            "Listing posts"
        );

        let store = &self.store;
        let (total, items) = self
            .bounded("list posts", async {
                let total = store.count(&plan.filter).await?;
                let items = store.find_page(&plan).await?;
                Ok::<_, RepoError>((total, items))
            })
            .await?;

        Ok(plan.into_page(items, total))
    }

    /// Most used tags, highest count first.
    pub async fn metrics_by_tag(
        &self,
        limit: i64,
        only_published: PublishedFilter,
    ) -> Result<Vec<TagMetric>, PostError> {
        let pipeline = TagPipeline::build(limit, only_published);

        self.bounded("aggregate by tag", self.store.aggregate_tags(&pipeline))
            .await
    }

    async fn bounded<T, F>(&self, context: &str, operation: F) -> Result<T, PostError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                let kind = err.kind();
                if kind == ErrorKind::Store {
                    tracing::warn!(error = %err, operation = context, "Store operation failed");
                }
                Err::<T, _>(err).wrap_err(kind, context)
            }
            Err(elapsed) => {
                tracing::warn!(
                    operation = context,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store operation timed out"
                );
                Err::<T, _>(elapsed).wrap_err(ErrorKind::Store, context)
            }
        }
    }
}

fn parse_id(id: &str) -> Result<PostId, PostError> {
    id.parse::<PostId>().wrap_err(ErrorKind::InvalidId, "parse post id")
}
