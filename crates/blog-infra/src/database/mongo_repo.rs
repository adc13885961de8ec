//! MongoDB post store.

use async_trait::async_trait;
use bson::Document;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use blog_core::domain::{NewPost, Post, PostChanges, PostId, TagMetric};
use blog_core::error::RepoError;
use blog_core::ports::PostStore;
use blog_core::query::{ListPlan, PostFilter, TagPipeline};

use super::document::{
    POSTS_COLLECTION, PostDocument, TagMetricRow, filter_document, id_filter, pipeline_documents,
    sort_document, to_post_id, update_document,
};

/// Post store backed by the `posts` collection.
///
/// The driver's `Collection` is a cheap handle over a shared connection pool
/// and is safe for concurrent use.
#[derive(Clone)]
pub struct MongoPostStore {
    collection: Collection<PostDocument>,
}

impl MongoPostStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(POSTS_COLLECTION),
        }
    }
}

/// Classify a driver error. Detail stays inside the message for operators.
pub(crate) fn repo_error(err: mongodb::error::Error) -> RepoError {
    use mongodb::error::ErrorKind;

    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => RepoError::Connection(err.to_string()),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            RepoError::Serialization(err.to_string())
        }
        _ => RepoError::Query(err.to_string()),
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, post: NewPost) -> Result<PostId, RepoError> {
        let result = self
            .collection
            .insert_one(PostDocument::from(post))
            .await
            .map_err(repo_error)?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            RepoError::Serialization("inserted id is not an ObjectId".to_string())
        })?;
        Ok(to_post_id(oid))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, "Finding post by id");

        self.collection
            .find_one(id_filter(id))
            .await
            .map_err(repo_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn find_one_and_update(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        self.collection
            .find_one_and_update(id_filter(id), update_document(&changes))
            .return_document(ReturnDocument::After)
            .await
            .map_err(repo_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn delete_by_id(&self, id: PostId) -> Result<u64, RepoError> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(repo_error)?;

        Ok(result.deleted_count)
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        self.collection
            .count_documents(filter_document(filter))
            .await
            .map_err(repo_error)
    }

    async fn find_page(&self, plan: &ListPlan) -> Result<Vec<Post>, RepoError> {
        let cursor = self
            .collection
            .find(filter_document(&plan.filter))
            .sort(sort_document(plan.sort))
            .skip(plan.skip)
            .limit(plan.limit)
            .await
            .map_err(repo_error)?;

        let docs: Vec<PostDocument> = cursor.try_collect().await.map_err(repo_error)?;
        docs.into_iter().map(Post::try_from).collect()
    }

    async fn aggregate_tags(&self, pipeline: &TagPipeline) -> Result<Vec<TagMetric>, RepoError> {
        let cursor = self
            .collection
            .aggregate(pipeline_documents(pipeline))
            .await
            .map_err(repo_error)?;

        let rows: Vec<Document> = cursor.try_collect().await.map_err(repo_error)?;
        rows.into_iter()
            .map(|row| {
                bson::from_document::<TagMetricRow>(row)
                    .map(TagMetric::from)
                    .map_err(|e| RepoError::Serialization(e.to_string()))
            })
            .collect()
    }
}
