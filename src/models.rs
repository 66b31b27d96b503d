//! Data models for Google Drive API responses.

use serde::{Deserialize, Serialize};

/// Metadata for a file or folder in Google Drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileMetadata>,
}

/// Permission resource returned by permissions.create.
#[derive(Debug, Deserialize)]
pub struct PermissionResource {
    pub id: String,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}
