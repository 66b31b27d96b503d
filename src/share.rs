//! The share pipeline: resolve the target, grant access, return its link.

use tracing::info;

use crate::error::Result;
use crate::permission::Audience;
use crate::resolver::{resolve_id, DriveTarget};
use crate::service::DriveService;

/// Share `target` with `audience` and return its web view link.
///
/// Nothing is rolled back if fetching the link fails after the permission was created.
pub async fn share_link<S>(service: &S, target: &DriveTarget, audience: &Audience) -> Result<String>
where
    S: DriveService + ?Sized,
{
    let file_id = resolve_id(service, target).await?;
    info!(path = %target.path().display(), file_id = %file_id, "resolved Drive file");

    service
        .create_permission(&file_id, &audience.permission())
        .await?;

    service.web_view_link(&file_id).await
}
