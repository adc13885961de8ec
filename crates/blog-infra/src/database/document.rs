//! BSON mapping of the `posts` collection and of query plans.

use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document, doc};
use serde::{Deserialize, Serialize};

use blog_core::domain::{NewPost, Post, PostChanges, PostId, TagMetric};
use blog_core::error::RepoError;
use blog_core::query::{PipelineStage, PostFilter, SortOrder, TagPipeline};

/// Name of the collection holding posts.
pub const POSTS_COLLECTION: &str = "posts";

/// Stored shape of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(
        rename = "publishedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// One row of the by-tag aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct TagMetricRow {
    #[serde(rename = "_id")]
    pub tag: String,
    pub count: i64,
}

impl From<TagMetricRow> for TagMetric {
    fn from(row: TagMetricRow) -> Self {
        Self {
            tag: row.tag,
            count: row.count,
        }
    }
}

pub fn to_object_id(id: PostId) -> ObjectId {
    ObjectId::from_bytes(id.bytes())
}

pub fn to_post_id(oid: ObjectId) -> PostId {
    PostId::from_bytes(oid.bytes())
}

/// Conversion from a new domain post to the stored document.
impl From<NewPost> for PostDocument {
    fn from(post: NewPost) -> Self {
        Self {
            id: None,
            title: post.title,
            author: post.author,
            content: post.content,
            tags: post.tags,
            published: post.published,
            published_at: post.published_at.map(DateTime::from_chrono),
            created_at: DateTime::from_chrono(post.created_at),
            updated_at: None,
        }
    }
}

/// Conversion from a stored document to the domain post.
impl TryFrom<PostDocument> for Post {
    type Error = RepoError;

    fn try_from(doc: PostDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| RepoError::Serialization("post document without _id".to_string()))?;

        Ok(Self {
            id: to_post_id(id),
            title: doc.title,
            author: doc.author,
            content: doc.content,
            tags: doc.tags,
            published: doc.published,
            published_at: doc.published_at.map(|dt| dt.to_chrono()),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.map(|dt| dt.to_chrono()),
        })
    }
}

/// `_id` equality filter.
pub fn id_filter(id: PostId) -> Document {
    doc! { "_id": to_object_id(id) }
}

/// Listing filter. Present conditions are ANDed by sitting in one document.
pub fn filter_document(filter: &PostFilter) -> Document {
    let mut doc = Document::new();
    if let Some(text) = &filter.text {
        doc.insert("$text", doc! { "$search": text.as_str() });
    }
    if let Some(tag) = &filter.tag {
        doc.insert("tags", tag.as_str());
    }
    if let Some(published) = filter.published {
        doc.insert("published", published);
    }
    doc
}

pub fn sort_document(sort: SortOrder) -> Document {
    let mut doc = Document::new();
    doc.insert(SortOrder::FIELD, sort.direction());
    doc
}

/// `$set` update for one atomic find-and-update.
pub fn update_document(changes: &PostChanges) -> Document {
    let mut set = doc! {
        "title": changes.title.as_str(),
        "author": changes.author.as_str(),
        "content": changes.content.as_str(),
        "tags": changes.tags.clone(),
        "published": changes.published,
        "updatedAt": DateTime::from_chrono(changes.updated_at),
    };
    if let Some(published_at) = changes.published_at {
        set.insert("publishedAt", DateTime::from_chrono(published_at));
    }
    doc! { "$set": set }
}

/// Native aggregation pipeline for the by-tag metrics plan.
pub fn pipeline_documents(pipeline: &TagPipeline) -> Vec<Document> {
    pipeline.stages().iter().map(stage_document).collect()
}

fn stage_document(stage: &PipelineStage) -> Document {
    match stage {
        PipelineStage::MatchSource { published } => {
            let mut source = doc! { "tags": { "$type": "string" } };
            if let Some(published) = published {
                source.insert("published", *published);
            }
            doc! { "$match": source }
        }
        PipelineStage::UnwindTags => doc! { "$unwind": "$tags" },
        PipelineStage::SkipEmptyTags => doc! { "$match": { "tags": { "$ne": "" } } },
        PipelineStage::GroupByTag => doc! {
            "$group": { "_id": "$tags", "count": { "$sum": 1 } }
        },
        PipelineStage::SortByCountDesc => doc! { "$sort": { "count": -1 } },
        PipelineStage::Limit(n) => doc! { "$limit": Bson::Int64(*n) },
    }
}
