//! In-memory post store - used when MongoDB is not configured and in tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostChanges, PostId, TagMetric};
use blog_core::error::RepoError;
use blog_core::ports::PostStore;
use blog_core::query::{ListPlan, PostFilter, TagPipeline};

/// In-memory post collection guarded by an async RwLock.
///
/// Posts are kept in insertion order, which stands in for the natural order of
/// a document store. Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
    counter: AtomicU32,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            counter: AtomicU32::new(0),
        }
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    /// ObjectId-shaped identity: seconds since epoch, 4 random bytes, counter.
    fn next_id(&self) -> PostId {
        let mut bytes = [0u8; 12];
        let secs = Utc::now().timestamp() as u32;
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);

        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..8].copy_from_slice(&Uuid::new_v4().as_bytes()[..4]);
        bytes[8..].copy_from_slice(&seq.to_be_bytes());
        PostId::from_bytes(bytes)
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: NewPost) -> Result<PostId, RepoError> {
        let id = self.next_id();
        let mut posts = self.posts.write().await;
        posts.push(post.into_post(id));
        Ok(id)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_one_and_update(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        // Single write lock: the read-modify-write is atomic for other tasks.
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        changes.apply_to(post);
        Ok(Some(post.clone()))
    }

    async fn delete_by_id(&self, id: PostId) -> Result<u64, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok((before - posts.len()) as u64)
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_page(&self, plan: &ListPlan) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;

        let mut matched: Vec<&Post> = posts.iter().filter(|p| plan.filter.matches(p)).collect();
        matched.sort_by(|a, b| plan.sort.compare(a, b));

        let skip = usize::try_from(plan.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(plan.limit).unwrap_or(0);
        Ok(matched.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn aggregate_tags(&self, pipeline: &TagPipeline) -> Result<Vec<TagMetric>, RepoError> {
        let posts = self.posts.read().await;
        Ok(pipeline.evaluate(posts.iter()))
    }
}
