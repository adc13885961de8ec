//! Listing: filter composition, sort selection and page arithmetic.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::Post;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Tri-state publish filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishedFilter {
    /// No filter on the publish flag.
    #[default]
    Unset,
    True,
    False,
}

impl PublishedFilter {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PublishedFilter::Unset => None,
            PublishedFilter::True => Some(true),
            PublishedFilter::False => Some(false),
        }
    }
}

impl From<Option<bool>> for PublishedFilter {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => PublishedFilter::Unset,
            Some(true) => PublishedFilter::True,
            Some(false) => PublishedFilter::False,
        }
    }
}

/// Listing request as handed over by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPostsParams {
    /// Free text matched against the title/content text index.
    pub q: String,
    /// Exact tag the post must carry.
    pub tag: String,
    pub published: PublishedFilter,
    pub page: i64,
    pub limit: i64,
    /// `publishedAt` for oldest first; anything else means newest first.
    pub sort: String,
}

/// Conditions a post must meet. All present conditions are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub text: Option<String>,
    pub tag: Option<String>,
    pub published: Option<bool>,
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.tag.is_none() && self.published.is_none()
    }

    /// Reference semantics for stores without a native query engine.
    ///
    /// Text search matches when any whitespace-separated term occurs in the
    /// title or content, ignoring case.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(published) = self.published {
            if post.published != published {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if let Some(text) = &self.text {
            let title = post.title.to_lowercase();
            let content = post.content.to_lowercase();
            let hit = text
                .split_whitespace()
                .map(str::to_lowercase)
                .any(|term| title.contains(&term) || content.contains(&term));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Sort on `publishedAt`, the only recognized sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub const FIELD: &'static str = "publishedAt";

    /// Unrecognized values fall back to newest first.
    pub fn parse(raw: &str) -> Self {
        if raw == Self::FIELD {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    /// `1` or `-1`, the document-store sort direction.
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Compare two posts the way the store orders them: a missing
    /// `publishedAt` sorts below every timestamp.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        let ord = a.published_at.cmp(&b.published_at);
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

/// Store-ready listing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub filter: PostFilter,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
    pub skip: u64,
}

impl ListPlan {
    /// Shape a listing request into a plan.
    pub fn build(params: &ListPostsParams) -> Self {
        let page = if params.page <= 0 { 1 } else { params.page };
        let limit = normalize_limit(params.limit);

        let filter = PostFilter {
            text: non_empty(&params.q),
            tag: non_empty(&params.tag),
            published: params.published.as_bool(),
        };

        let skip = (page - 1).saturating_mul(limit);

        Self {
            filter,
            sort: SortOrder::parse(&params.sort),
            page,
            limit,
            skip: u64::try_from(skip).unwrap_or(u64::MAX),
        }
    }

    /// Assemble the result page from the window and the total match count.
    pub fn into_page(self, items: Vec<Post>, total: u64) -> PostPage {
        PostPage {
            items,
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total_pages(total, self.limit),
        }
    }
}

/// One page of posts plus the numbers needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: u64,
}

/// Default when non-positive, capped at [`MAX_PAGE_LIMIT`].
pub fn normalize_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        limit.min(MAX_PAGE_LIMIT)
    }
}

fn total_pages(total: u64, limit: i64) -> u64 {
    let limit = limit.max(1) as u64;
    total.div_ceil(limit)
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
