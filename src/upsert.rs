//! Create-or-update of a single file through the contents API

use crate::error::Result;
use crate::hosting::{FileUpsertRequest, HostingApi};

/// Creates or updates a single file's content on a branch.
///
/// Looks up the current content revision first: a missing file is the
/// create case and submits without a base revision; an existing file's
/// revision is passed along so the service can reject an update that would
/// overwrite a concurrently made change. Any non-404 lookup failure aborts
/// the upsert before anything is written.
///
/// No retry is attempted on submission failure. A revision conflict means
/// another writer got there first; that is fatal to this call and the
/// caller decides what to do. Two upserts racing on the same path are
/// unsafe for the same reason, so callers serialize writes themselves.
///
/// # Arguments
/// * `api` - Hosting API handle
/// * `req` - Upsert request; the base revision is resolved here, never supplied
///
/// # Returns
/// * `Ok(sha)` - SHA of the new commit
/// * `Err` - `ContentLookup` or `FileCommit` failure
pub fn upsert(api: &dyn HostingApi, req: &FileUpsertRequest) -> Result<String> {
    let existing = api.get_content(&req.owner, &req.repo, &req.path, req.branch.as_deref())?;
    let base_revision = existing.as_ref().map(|c| c.sha.as_str());

    api.put_content(req, base_revision)
}
