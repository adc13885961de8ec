//! Post endpoints.

use actix_web::{HttpResponse, http::header, web};
use blog_core::PostError;
use blog_core::domain::PostDraft;
use blog_core::query::{ListPostsParams, PublishedFilter};
use blog_shared::dto::{CreatedResponse, ListPostsQuery, PostPayload, TagMetricsQuery};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// List posts with filters, sorting and pagination.
///
/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let params = list_params(query.into_inner())?;
    let page = state.posts.list(&params).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Create a post.
///
/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let draft = into_draft(body.into_inner())?;
    let id = state.posts.create(draft).await?;

    tracing::info!(post_id = %id, "Post created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/posts/{id}")))
        .json(CreatedResponse {
            inserted_id: id.to_hex(),
        }))
}

/// Fetch a single post.
///
/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Replace the editable fields of a post.
///
/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let draft = into_draft(body.into_inner())?;
    let post = state.posts.update_by_id(&path, draft).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post.
///
/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete_by_id(&path).await?;

    tracing::info!(post_id = %path, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Tag usage counts, highest first.
///
/// GET /api/posts/metrics/by-tag
pub async fn metrics_by_tag(
    state: web::Data<AppState>,
    query: web::Query<TagMetricsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let limit = parse_positive("limit", query.limit.as_deref())?.unwrap_or(0);
    let only_published = parse_flag("onlyPublished", query.only_published.as_deref())?;

    let metrics = state.posts.metrics_by_tag(limit, only_published).await?;
    Ok(HttpResponse::Ok().json(metrics))
}

fn into_draft(payload: PostPayload) -> Result<PostDraft, PostError> {
    let problems = payload.validate();
    if !problems.is_empty() {
        return Err(PostError::invalid_input(problems.join(", ")));
    }

    Ok(PostDraft {
        title: payload.title,
        author: payload.author,
        content: payload.content,
        tags: payload.tags,
        published: payload.published,
        published_at: payload.published_at,
    })
}

fn list_params(query: ListPostsQuery) -> Result<ListPostsParams, PostError> {
    Ok(ListPostsParams {
        q: trimmed(query.q),
        tag: trimmed(query.tag),
        published: parse_flag("published", query.published.as_deref())?,
        page: parse_positive("page", query.page.as_deref())?.unwrap_or(0),
        limit: parse_positive("limit", query.limit.as_deref())?.unwrap_or(0),
        sort: query.sort.unwrap_or_default(),
    })
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Absent or empty parameters yield `None` so the query builder applies its defaults.
fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<i64>, PostError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(PostError::invalid_input(format!(
            "{name} must be a positive integer"
        ))),
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<PublishedFilter, PostError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(PublishedFilter::Unset);
    };

    if raw.eq_ignore_ascii_case("true") {
        Ok(PublishedFilter::True)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(PublishedFilter::False)
    } else {
        Err(PostError::invalid_input(format!("{name} must be true or false")))
    }
}
