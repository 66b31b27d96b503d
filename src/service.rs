//! The remote operations the share pipeline needs from a Drive backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::permission::Permission;

/// Identifier of the user's My Drive root folder.
pub const ROOT_ID: &str = "root";

#[async_trait]
pub trait DriveService: Send + Sync {
    /// ID of the first child of `parent_id` named exactly `name`, if any.
    async fn find_child(&self, parent_id: &str, name: &str) -> Result<Option<String>>;

    /// Grant `permission` on `file_id`. Every call creates a new grant.
    async fn create_permission(&self, file_id: &str, permission: &Permission) -> Result<()>;

    /// Browser URL of `file_id`.
    async fn web_view_link(&self, file_id: &str) -> Result<String>;
}
