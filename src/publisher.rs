//! Release publication with optional asset upload

use std::fs;
use std::path::Path;

use crate::error::{GhPublishError, Result};
use crate::hosting::{HostingApi, ReleaseId, ReleaseRequest};

/// Message recorded on the annotated tag object of every release.
pub const TAG_MESSAGE: &str = "Create new release";

/// Publishes a release for an already-resolved tag.
///
/// Creates the release, then an annotated tag object at the target commit
/// (release creation alone only guarantees a lightweight tag), then uploads
/// the direct file entries of the asset directory, if one was given. Only
/// top-level files are uploaded; subdirectories and their contents are
/// ignored.
///
/// A failure while creating the release or the tag object aborts the
/// operation with no cleanup of whatever was already created. A failure
/// while reading or uploading an asset abandons the remaining uploads; the
/// release then exists with a subset of its intended assets, which is
/// surfaced to the caller rather than retried.
///
/// # Arguments
/// * `api` - Hosting API handle
/// * `req` - Release request; the display name defaults to the tag
///
/// # Returns
/// * `Ok(ReleaseId)` - Identifier of the created release
/// * `Err` - `ReleaseCreation` or `AssetUpload` failure
pub fn publish(api: &dyn HostingApi, req: &ReleaseRequest) -> Result<ReleaseId> {
    let name = req.name.as_deref().unwrap_or(&req.tag);
    let release = api.create_release(&req.owner, &req.repo, &req.tag, &req.target_commit, name)?;

    api.create_tag_object(&req.owner, &req.repo, &req.tag, &req.target_commit, TAG_MESSAGE)?;

    if let Some(dir) = &req.assets {
        upload_assets(api, req, release, dir)?;
    }

    Ok(release)
}

fn upload_assets(
    api: &dyn HostingApi,
    req: &ReleaseRequest,
    release: ReleaseId,
    dir: &Path,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        GhPublishError::asset_upload(format!(
            "failed to read asset directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            GhPublishError::asset_upload(format!("failed to read asset directory entry: {}", e))
        })?;

        let file_type = entry.file_type().map_err(|e| {
            GhPublishError::asset_upload(format!(
                "failed to inspect '{}': {}",
                entry.path().display(),
                e
            ))
        })?;
        if file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        let content = fs::read(entry.path()).map_err(|e| {
            GhPublishError::asset_upload(format!(
                "failed to read asset '{}': {}",
                entry.path().display(),
                e
            ))
        })?;

        api.upload_release_asset(&req.owner, &req.repo, release, &name, &content)?;
    }

    Ok(())
}
