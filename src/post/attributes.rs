//! Attribute sets used to build and merge posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user-editable fields of a post.
///
/// Produced by a validated form and handed to the store on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAttributes {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
}

impl PostAttributes {
    /// Attributes with the given title and empty description/body
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A partial overwrite of a stored post.
///
/// `None` keeps the stored value. `id` and `created_at` are normally left
/// `None`; setting them is an explicit override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl PostPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// True when applying the patch cannot change anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A full attribute set overwrites every editable field and nothing else.
impl From<PostAttributes> for PostPatch {
    fn from(attrs: PostAttributes) -> Self {
        Self {
            id: None,
            title: Some(attrs.title),
            description: Some(attrs.description),
            body: Some(attrs.body),
            created_at: None,
        }
    }
}
