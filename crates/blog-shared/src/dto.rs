//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 140;

/// Body of `POST /api/posts` and `PUT /api/posts/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PostPayload {
    /// Field-level problems, empty when the payload is acceptable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let title_len = self.title.chars().count();
        if title_len == 0 {
            problems.push("title is required".to_string());
        } else if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            problems.push(format!(
                "title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
            ));
        }
        if self.author.is_empty() {
            problems.push("author is required".to_string());
        }
        if self.content.is_empty() {
            problems.push("content is required".to_string());
        }

        problems
    }
}

/// Accept `"tags": null` as no tags.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    #[serde(rename = "insertedID")]
    pub inserted_id: String,
}

/// Raw query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub published: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// Raw query string of `GET /api/posts/metrics/by-tag`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetricsQuery {
    pub limit: Option<String>,
    pub only_published: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> PostPayload {
        PostPayload {
            title: title.to_string(),
            author: "Ana García".to_string(),
            content: "Body".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload("Hello").validate().is_empty());
        assert!(payload(&"x".repeat(140)).validate().is_empty());
    }

    #[test]
    fn test_title_length_bounds() {
        assert_eq!(payload("Hey").validate().len(), 1);
        assert_eq!(payload(&"x".repeat(141)).validate().len(), 1);
        assert_eq!(payload("").validate(), vec!["title is required".to_string()]);
        // Counted in characters, not bytes.
        assert!(payload("ñandú").validate().is_empty());
    }

    #[test]
    fn test_required_fields() {
        let problems = PostPayload {
            title: "Hello world".to_string(),
            ..Default::default()
        }
        .validate();
        assert_eq!(
            problems,
            vec!["author is required".to_string(), "content is required".to_string()]
        );
    }

    #[test]
    fn test_payload_deserializes_camel_case() {
        let payload: PostPayload = serde_json::from_str(
            r#"{"title":"Hello world","author":"ana","content":"x","tags":["go"],"published":true,"publishedAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(payload.published);
        assert_eq!(payload.tags, vec!["go".to_string()]);
        assert!(payload.published_at.is_some());
    }

    #[test]
    fn test_null_tags_mean_no_tags() {
        let payload: PostPayload = serde_json::from_str(
            r#"{"title":"Hello world","author":"ana","content":"x","tags":null}"#,
        )
        .unwrap();
        assert!(payload.tags.is_empty());
        assert!(payload.validate().is_empty());

        let payload: PostPayload =
            serde_json::from_str(r#"{"title":"Hello world","author":"ana","content":"x"}"#)
                .unwrap();
        assert!(payload.tags.is_empty());
    }
}
