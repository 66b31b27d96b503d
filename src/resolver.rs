//! Mapping local paths under the Drive root to Drive file IDs.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{DriveError, Result};
use crate::service::{DriveService, ROOT_ID};

/// A local path checked to exist strictly below the configured Drive root.
#[derive(Debug, Clone)]
pub struct DriveTarget {
    path: PathBuf,
    segments: Vec<String>,
}

impl DriveTarget {
    /// Validate `file_path` against the Drive root of `config`.
    ///
    /// The path is canonicalized first, so relative paths and symlinks are resolved.
    pub fn new<P: AsRef<Path>>(config: &Config, file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        let path = file_path
            .canonicalize()
            .map_err(|_| DriveError::PathNotFound(file_path.to_path_buf()))?;

        let root = config.drive_root();
        let root = root.canonicalize().unwrap_or(root);

        let relative = match path.strip_prefix(&root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => {
                return Err(DriveError::NotInDriveFolder {
                    path: path.clone(),
                    root: config.gdrive_path.clone(),
                })
            }
        };

        let segments = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .map(|name| {
                name.to_str()
                    .map(str::to_string)
                    .ok_or_else(|| DriveError::NonUtf8Path(path.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { path, segments })
    }

    /// The canonical local path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path components relative to the Drive root, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Resolve the Drive ID of `target` by looking up one segment at a time from the root.
///
/// Fails with `SegmentNotFound` at the first segment that has no match. When a folder
/// holds several children with the same name, the first one the API returns is used.
pub async fn resolve_id<S>(service: &S, target: &DriveTarget) -> Result<String>
where
    S: DriveService + ?Sized,
{
    let mut current = ROOT_ID.to_string();
    for segment in target.segments() {
        let child = service.find_child(&current, segment).await?;
        current = child.ok_or_else(|| DriveError::SegmentNotFound {
            segment: segment.clone(),
            parent_id: current.clone(),
        })?;
        debug!(segment = %segment, id = %current, "resolved path segment");
    }
    Ok(current)
}
