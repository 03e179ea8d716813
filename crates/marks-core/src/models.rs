//! Data models for marks
//!
//! Wire representations of the REST API's users, bookmarks and folders,
//! plus the request payloads and the export record format.
//! Identifiers are opaque server-assigned strings (`_id` on the wire).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Something the server identifies with an opaque id
pub trait Identified {
    fn id(&self) -> &str;
}

/// A signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Response of the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// A saved bookmark as the server returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Unique identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display title
    pub title: String,
    /// The URL
    pub url: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags for organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Folder this bookmark is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Owning user id
    #[serde(default)]
    pub user: String,
    /// When this bookmark was created, if the server reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Bookmark {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A folder as the server returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Folder {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for `POST /bookmarks`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateBookmarkData {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateBookmarkData {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
            tags: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Partial payload for `PUT /bookmarks/:id`; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateBookmarkData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl UpdateBookmarkData {
    /// True when no field would be sent
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.folder.is_none()
    }
}

/// Payload for `POST /folders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFolderData {
    pub name: String,
}

impl CreateFolderData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Payload for `PUT /folders/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateFolderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Plain bookmark record used by export and import
///
/// Missing `description`/`tags` deserialize to empty values so hand-written
/// import files may omit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportedBookmark {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<&Bookmark> for ExportedBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            description: bookmark.description.clone().unwrap_or_default(),
            tags: bookmark.tags.clone(),
        }
    }
}

impl From<ExportedBookmark> for CreateBookmarkData {
    fn from(record: ExportedBookmark) -> Self {
        Self {
            title: record.title,
            url: record.url,
            description: if record.description.is_empty() {
                None
            } else {
                Some(record.description)
            },
            tags: Some(record.tags),
        }
    }
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success_count: usize,
    pub fail_count: usize,
}

/// Error envelope the server sends with non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}
