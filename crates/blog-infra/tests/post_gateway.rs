//! Gateway behaviour against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use async_trait::async_trait;
use blog_core::domain::{NewPost, Post, PostChanges, PostDraft, PostId, TagMetric};
use blog_core::error::RepoError;
use blog_core::ports::PostStore;
use blog_core::query::{ListPlan, ListPostsParams, PostFilter, PublishedFilter, TagPipeline};
use blog_core::{ErrorKind, PostGateway};
use blog_infra::InMemoryPostStore;

const ABSENT_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

fn gateway() -> PostGateway {
    PostGateway::new(Arc::new(InMemoryPostStore::new()))
}

fn draft(title: &str) -> PostDraft {
    PostDraft::new(title, "Ana García", "Cómo integrar MongoDB con aplicaciones Go")
}

fn close_to_now(ts: chrono::DateTime<Utc>) -> bool {
    (Utc::now() - ts).abs() < Duration::seconds(5)
}

#[tokio::test]
async fn create_unpublished_has_no_published_at() {
    let gateway = gateway();
    let id = gateway.create(draft("Draft notes")).await.unwrap();

    let post = gateway.get_by_id(&id.to_string()).await.unwrap();
    assert!(!post.published);
    assert_eq!(post.published_at, None);
    assert!(close_to_now(post.created_at));
    assert_eq!(post.updated_at, None);
}

#[tokio::test]
async fn create_published_stamps_creation_instant() {
    let gateway = gateway();
    let id = gateway
        .create(draft("Going live").published(true))
        .await
        .unwrap();

    let post = gateway.get_by_id(&id.to_string()).await.unwrap();
    assert_eq!(post.published_at, Some(post.created_at));
}

#[tokio::test]
async fn update_stamps_publish_transition_and_never_clears_it() {
    let gateway = gateway();
    let id = gateway.create(draft("Draft notes")).await.unwrap().to_string();

    let published = gateway
        .update_by_id(&id, draft("Draft notes").published(true))
        .await
        .unwrap();
    let stamped = published.published_at.expect("publishedAt stamped");
    assert!(close_to_now(stamped));
    assert!(stamped >= published.created_at);
    assert!(published.updated_at.is_some());

    let unpublished = gateway
        .update_by_id(&id, draft("Draft notes").published(false))
        .await
        .unwrap();
    assert!(!unpublished.published);
    assert_eq!(unpublished.published_at, Some(stamped));

    let republished = gateway
        .update_by_id(&id, draft("Draft notes").published(true))
        .await
        .unwrap();
    assert!(republished.published_at.unwrap() >= stamped);
}

#[tokio::test]
async fn update_keeps_published_at_when_already_published() {
    let gateway = gateway();
    let id = gateway
        .create(draft("Going live").published(true))
        .await
        .unwrap()
        .to_string();
    let original = gateway.get_by_id(&id).await.unwrap();

    let updated = gateway
        .update_by_id(&id, draft("Going live, edited").published(true))
        .await
        .unwrap();
    assert_eq!(updated.published_at, original.published_at);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "Going live, edited");
}

#[tokio::test]
async fn explicit_published_at_wins_on_update() {
    let gateway = gateway();
    let id = gateway.create(draft("Backdated")).await.unwrap().to_string();

    let backdated = Utc::now() - Duration::days(30);
    let mut changes = draft("Backdated").published(true);
    changes.published_at = Some(backdated);

    let post = gateway.update_by_id(&id, changes).await.unwrap();
    assert_eq!(post.published_at, Some(backdated));
}

#[tokio::test]
async fn get_by_id_classifies_failures() {
    let gateway = gateway();

    let err = gateway.get_by_id("xyz").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidId);

    let err = gateway.get_by_id(ABSENT_ID).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = gateway
        .update_by_id(ABSENT_ID, draft("Nobody home"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn round_trip_keeps_written_fields() {
    let gateway = gateway();
    let written = draft("Round trip")
        .with_tags(["go", "", "go", "api"])
        .published(true);
    let id = gateway.create(written.clone()).await.unwrap();

    let post = gateway.get_by_id(&id.to_string()).await.unwrap();
    assert_eq!(post.id, id);
    assert_eq!(post.title, written.title);
    assert_eq!(post.author, written.author);
    assert_eq!(post.content, written.content);
    assert_eq!(post.tags, written.tags);
    assert_eq!(post.published, written.published);

    let replaced = draft("Round trip, again").with_tags(["rust"]);
    let updated = gateway.update_by_id(&id.to_string(), replaced.clone()).await.unwrap();
    let fetched = gateway.get_by_id(&id.to_string()).await.unwrap();
    assert_eq!(updated, fetched);
    assert_eq!(fetched.title, replaced.title);
    assert_eq!(fetched.tags, replaced.tags);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let gateway = gateway();
    let id = gateway.create(draft("Short lived")).await.unwrap().to_string();

    gateway.delete_by_id(&id).await.unwrap();

    let err = gateway.get_by_id(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = gateway.delete_by_id(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = gateway.delete_by_id("not-hex").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidId);
}

#[tokio::test]
async fn metrics_by_tag_counts_non_empty_tags() {
    let gateway = gateway();
    gateway
        .create(draft("Tagged one").with_tags(["go", "go", "web"]).published(true))
        .await
        .unwrap();
    gateway
        .create(draft("Tagged two").with_tags(["go"]))
        .await
        .unwrap();
    gateway
        .create(draft("Tagged three").with_tags([""]).published(true))
        .await
        .unwrap();

    let metrics = gateway
        .metrics_by_tag(0, PublishedFilter::Unset)
        .await
        .unwrap();
    assert_eq!(
        metrics,
        vec![
            TagMetric { tag: "go".into(), count: 3 },
            TagMetric { tag: "web".into(), count: 1 },
        ]
    );

    let published_only = gateway
        .metrics_by_tag(10, PublishedFilter::True)
        .await
        .unwrap();
    assert_eq!(
        published_only,
        vec![
            TagMetric { tag: "go".into(), count: 2 },
            TagMetric { tag: "web".into(), count: 1 },
        ]
    );

    let drafts_only = gateway
        .metrics_by_tag(10, PublishedFilter::False)
        .await
        .unwrap();
    assert_eq!(drafts_only, vec![TagMetric { tag: "go".into(), count: 1 }]);
}

fn titles(items: &[Post]) -> Vec<String> {
    items.iter().map(|p| p.title.clone()).collect()
}

async fn seed_published(gateway: &PostGateway, n: i64) {
    let base = Utc::now() - Duration::days(365);
    for i in 0..n {
        let mut post = draft(&format!("Post number {i:02}")).published(true);
        post.published_at = Some(base + Duration::days(i));
        gateway.create(post).await.unwrap();
    }
}

#[tokio::test]
async fn list_paginates_over_total() {
    let gateway = gateway();
    seed_published(&gateway, 25).await;

    let page = |page| ListPostsParams {
        page,
        limit: 10,
        ..Default::default()
    };

    let first = gateway.list(&page(1)).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 3);

    let third = gateway.list(&page(3)).await.unwrap();
    assert_eq!(third.items.len(), 5);

    let fourth = gateway.list(&page(4)).await.unwrap();
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total, 25);
    assert_eq!(fourth.page, 4);
}

#[tokio::test]
async fn list_sorts_by_published_at() {
    let gateway = gateway();
    seed_published(&gateway, 3).await;

    let newest_first = gateway.list(&ListPostsParams::default()).await.unwrap();
    assert_eq!(
        titles(&newest_first.items),
        vec!["Post number 02", "Post number 01", "Post number 00"]
    );

    let oldest_first = gateway
        .list(&ListPostsParams {
            sort: "publishedAt".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        titles(&oldest_first.items),
        vec!["Post number 00", "Post number 01", "Post number 02"]
    );

    let unknown = gateway
        .list(&ListPostsParams {
            sort: "title".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&unknown.items), titles(&newest_first.items));
}

#[tokio::test]
async fn list_filters_are_anded() {
    let gateway = gateway();
    gateway
        .create(draft("MongoDB indexes").with_tags(["mongodb"]).published(true))
        .await
        .unwrap();
    gateway
        .create(draft("MongoDB drafts").with_tags(["mongodb"]))
        .await
        .unwrap();
    gateway
        .create(draft("Nuxt 3 frontend").with_tags(["nuxt"]).published(true))
        .await
        .unwrap();

    let result = gateway
        .list(&ListPostsParams {
            tag: "mongodb".into(),
            published: PublishedFilter::True,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].title, "MongoDB indexes");

    let result = gateway
        .list(&ListPostsParams {
            q: "nuxt".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].title, "Nuxt 3 frontend");

    let result = gateway
        .list(&ListPostsParams {
            published: PublishedFilter::False,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.limit, 10);
    assert_eq!(result.total_pages, 1);
}

/// Deletes the target document right before delegating the atomic update,
/// as a concurrent delete landing between the read and the write would.
struct DeletingStore {
    inner: InMemoryPostStore,
}

#[async_trait]
impl PostStore for DeletingStore {
    async fn insert(&self, post: NewPost) -> Result<PostId, RepoError> {
        self.inner.insert(post).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn find_one_and_update(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        self.inner.delete_by_id(id).await?;
        self.inner.find_one_and_update(id, changes).await
    }

    async fn delete_by_id(&self, id: PostId) -> Result<u64, RepoError> {
        self.inner.delete_by_id(id).await
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        self.inner.count(filter).await
    }

    async fn find_page(&self, plan: &ListPlan) -> Result<Vec<Post>, RepoError> {
        self.inner.find_page(plan).await
    }

    async fn aggregate_tags(&self, pipeline: &TagPipeline) -> Result<Vec<TagMetric>, RepoError> {
        self.inner.aggregate_tags(pipeline).await
    }
}

#[tokio::test]
async fn update_of_post_deleted_after_read_is_not_found() {
    let store = Arc::new(DeletingStore {
        inner: InMemoryPostStore::new(),
    });
    let gateway = PostGateway::new(store.clone());
    let id = gateway.create(draft("Soon gone")).await.unwrap().to_string();

    let err = gateway
        .update_by_id(&id, draft("Never written").published(true))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(store.inner.is_empty().await);
}
