//! Document reference model.
//!
//! Document storage and rendering are external collaborators; the gateway
//! only needs enough metadata to answer a grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a document exposed through share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Unique document identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// MIME type of the stored document.
    pub content_type: String,
    /// Number of renderable pages (if known).
    pub page_count: Option<i32>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
}

impl DocumentRef {
    /// Creates a new document reference.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content_type: content_type.into(),
            page_count: None,
            created_at: Utc::now(),
        }
    }
}
