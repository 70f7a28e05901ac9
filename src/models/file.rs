use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FileCategory;

/// Metadata for an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub path: String,
    pub url: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub category: FileCategory,
    pub related_id: Option<String>,
    pub description: Option<String>,
}

/// Filters for listing file metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileFilters {
    pub category: Option<FileCategory>,
    pub related_id: Option<String>,
}
