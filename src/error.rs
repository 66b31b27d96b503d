//! Error types for the gd_link crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating a share link.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("'{}' doesn't exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("'{}' is not in the Google Drive folder, which is {}", .path.display(), .root.display())]
    NotInDriveFolder { path: PathBuf, root: PathBuf },

    #[error("Path contains a non UTF-8 component: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("OAuth error: {0}")]
    OAuth(#[from] yup_oauth2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Path segment not found: {segment} (parent ID {parent_id})")]
    SegmentNotFound { segment: String, parent_id: String },

    #[error("No web view link returned for file {0}")]
    MissingWebViewLink(String),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
