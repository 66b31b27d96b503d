//! Google Drive API v3 client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata, PermissionResource};
use crate::permission::Permission;
use crate::service::DriveService;

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Authenticated handle to the Drive API.
pub struct DriveClient {
    access_token: String,
    base_url: String,
    http: Client,
}

impl DriveClient {
    /// Create a client talking to the public Drive API.
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, DRIVE_API_BASE)
    }

    /// Create a client against another API root (used by tests).
    pub fn with_base_url(access_token: String, base_url: &str) -> Self {
        Self {
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Query files using Google Drive query syntax. Only the first page is read.
    pub async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", query),
                ("spaces", "drive"),
                ("fields", "files(id, name)"),
            ])
            .send()
            .await?;

        let list_response: FileListResponse = ensure_success(response).await?.json().await?;
        Ok(list_response.files)
    }

    /// Get file metadata by ID.
    pub async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id, name, webViewLink")])
            .send()
            .await?;

        let metadata: FileMetadata = ensure_success(response).await?.json().await?;
        Ok(metadata)
    }
}

#[async_trait]
impl DriveService for DriveClient {
    async fn find_child(&self, parent_id: &str, name: &str) -> Result<Option<String>> {
        let query = child_query(parent_id, name);
        let files = self.query_files(&query).await?;
        Ok(files.into_iter().next().map(|file| file.id))
    }

    async fn create_permission(&self, file_id: &str, permission: &Permission) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/files/{}/permissions", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id")])
            .json(permission)
            .send()
            .await?;

        let created: PermissionResource = ensure_success(response).await?.json().await?;
        info!(file_id, permission_id = %created.id, "permission created");
        Ok(())
    }

    async fn web_view_link(&self, file_id: &str) -> Result<String> {
        let metadata = self.get_file(file_id).await?;
        debug!(file_id, name = ?metadata.name, "fetched file metadata");
        metadata
            .web_view_link
            .ok_or_else(|| DriveError::MissingWebViewLink(file_id.to_string()))
    }
}

/// Drive query selecting the non-trashed children of `parent_id` named `name`.
pub fn child_query(parent_id: &str, name: &str) -> String {
    format!(
        "'{}' in parents and name = '{}' and trashed = false",
        escape_query_value(parent_id),
        escape_query_value(name)
    )
}

fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Turn a non-2xx response into an `ApiError`, decoding Google's error envelope when present.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
