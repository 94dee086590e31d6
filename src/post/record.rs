//! The persisted post record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attributes::{PostAttributes, PostPatch};

/// One blog post as held by the store.
///
/// Fields are read-only; every change goes through the store, which hands
/// out clones. Invariant for persisted posts: `id` and `title` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    body: String,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Builds a post from an id, its editable attributes and a creation time.
    pub fn new(id: impl Into<String>, attrs: PostAttributes, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: attrs.title,
            description: attrs.description,
            body: attrs.body,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The editable attributes, without id or timestamp.
    pub fn attributes(&self) -> PostAttributes {
        PostAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
        }
    }

    /// A new post with `patch` laid over this one's full attribute set.
    pub fn merge(&self, patch: &PostPatch) -> Self {
        Self {
            id: patch.id.clone().unwrap_or_else(|| self.id.clone()),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            body: patch.body.clone().unwrap_or_else(|| self.body.clone()),
            created_at: patch.created_at.unwrap_or(self.created_at),
        }
    }

    /// Checks the invariants every persisted post must hold.
    pub fn check(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("post id must not be empty".into());
        }
        if self.title.is_empty() {
            return Err(format!("post '{}' has an empty title", self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn sample() -> Post {
        Post::new(
            "p-1",
            PostAttributes::new("Title")
                .with_description("desc")
                .with_body("body"),
            at(1_700_000_000),
        )
    }

    #[test]
    fn test_accessors() {
        let post = sample();
        assert_eq!(post.id(), "p-1");
        assert_eq!(post.title(), "Title");
        assert_eq!(post.description(), "desc");
        assert_eq!(post.body(), "body");
        assert_eq!(post.created_at(), at(1_700_000_000));
    }

    #[test]
    fn test_merge_preserves_identity_and_timestamp() {
        let post = sample();
        let merged = post.merge(&PostPatch::default().title("New"));

        assert_eq!(merged.id(), "p-1");
        assert_eq!(merged.created_at(), post.created_at());
        assert_eq!(merged.title(), "New");
        assert_eq!(merged.description(), "desc");
        assert_eq!(merged.body(), "body");
    }

    #[test]
    fn test_merge_with_full_attributes_overwrites_editable_fields() {
        let merged = sample().merge(&PostAttributes::new("Only title").into());
        assert_eq!(merged.title(), "Only title");
        assert_eq!(merged.description(), "");
        assert_eq!(merged.body(), "");
        assert_eq!(merged.id(), "p-1");
    }

    #[test]
    fn test_merge_explicit_overrides() {
        let merged = sample().merge(&PostPatch::default().id("p-2").created_at(at(5)));
        assert_eq!(merged.id(), "p-2");
        assert_eq!(merged.created_at(), at(5));
    }

    #[test]
    fn test_merge_does_not_alter_source() {
        let post = sample();
        let _ = post.merge(&PostPatch::default().title("Other"));
        assert_eq!(post.title(), "Title");
    }

    #[test]
    fn test_check_invariants() {
        assert!(sample().check().is_ok());
        assert!(Post::new("", PostAttributes::new("T"), at(0)).check().is_err());
        assert!(Post::new("id", PostAttributes::new(""), at(0)).check().is_err());
        assert!(Post::new("id", PostAttributes::new("   "), at(0)).check().is_ok());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], "p-1");
        assert_eq!(value["title"], "Title");
        assert_eq!(value["created_at"], "2023-11-14T22:13:20Z");

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }
}
