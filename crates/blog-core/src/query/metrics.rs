//! Tag metrics aggregation plan.

use std::collections::HashMap;

use crate::domain::{Post, TagMetric};

use super::list::{PublishedFilter, normalize_limit};

/// One stage of the by-tag aggregation, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    /// Keep documents whose `tags` holds strings, optionally with a given
    /// publish flag.
    MatchSource { published: Option<bool> },
    /// One row per tag.
    UnwindTags,
    /// Drop rows whose tag is the empty string.
    SkipEmptyTags,
    /// Group rows by tag value, counting them.
    GroupByTag,
    /// Highest count first. Ties keep no particular order.
    SortByCountDesc,
    Limit(i64),
}

/// Aggregation plan for tag metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPipeline {
    stages: Vec<PipelineStage>,
    limit: i64,
}

impl TagPipeline {
    pub fn build(limit: i64, only_published: PublishedFilter) -> Self {
        let limit = normalize_limit(limit);
        let stages = vec![
            PipelineStage::MatchSource {
                published: only_published.as_bool(),
            },
            PipelineStage::UnwindTags,
            PipelineStage::SkipEmptyTags,
            PipelineStage::GroupByTag,
            PipelineStage::SortByCountDesc,
            PipelineStage::Limit(limit),
        ];

        Self { stages, limit }
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Run the pipeline over posts held in memory.
    pub fn evaluate<'a, I>(&self, posts: I) -> Vec<TagMetric>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut source: Vec<&Post> = posts.into_iter().collect();
        let mut rows: Vec<&str> = Vec::new();
        let mut metrics: Vec<TagMetric> = Vec::new();

        for stage in &self.stages {
            match stage {
                PipelineStage::MatchSource { published } => {
                    source.retain(|p| {
                        !p.tags.is_empty() && published.is_none_or(|want| p.published == want)
                    });
                }
                PipelineStage::UnwindTags => {
                    rows = source
                        .iter()
                        .flat_map(|p| p.tags.iter().map(String::as_str))
                        .collect();
                }
                PipelineStage::SkipEmptyTags => rows.retain(|tag| !tag.is_empty()),
                PipelineStage::GroupByTag => {
                    let mut order: Vec<&str> = Vec::new();
                    let mut counts: HashMap<&str, i64> = HashMap::new();
                    for &tag in &rows {
                        let count = counts.entry(tag).or_insert_with(|| {
                            order.push(tag);
                            0
                        });
                        *count += 1;
                    }
                    metrics = order
                        .into_iter()
                        .map(|tag| TagMetric {
                            tag: tag.to_string(),
                            count: counts[tag],
                        })
                        .collect();
                }
                PipelineStage::SortByCountDesc => {
                    metrics.sort_by(|a, b| b.count.cmp(&a.count));
                }
                PipelineStage::Limit(n) => {
                    metrics.truncate(usize::try_from(*n).unwrap_or(0));
                }
            }
        }

        metrics
    }
}
