//! Query builder - pure translation of listing and metrics requests into
//! store-ready plans. No I/O happens here.

mod list;
mod metrics;

pub use list::{
    DEFAULT_PAGE_LIMIT, ListPlan, ListPostsParams, MAX_PAGE_LIMIT, PostFilter, PostPage,
    PublishedFilter, SortOrder, normalize_limit,
};
pub use metrics::{PipelineStage, TagPipeline};
