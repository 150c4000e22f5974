use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{GhPublishError, Result};
use crate::hosting::{
    ContentInfo, FileUpsertRequest, HostingApi, Page, PullRequestRef, ReleaseId, TagRef,
};

/// A release recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRelease {
    pub id: ReleaseId,
    pub tag: String,
    pub target_commit: String,
    pub name: String,
}

/// An annotated tag object recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTagObject {
    pub tag: String,
    pub sha: String,
    pub message: String,
}

/// An uploaded asset recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub release: ReleaseId,
    pub name: String,
    pub content: Vec<u8>,
}

/// File content stored by the mock, keyed by repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub sha: String,
    pub content: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    releases: Vec<CreatedRelease>,
    tag_objects: Vec<CreatedTagObject>,
    assets: Vec<UploadedAsset>,
    contents: HashMap<String, StoredContent>,
    commit_seq: u32,
}

/// Mock hosting API for testing without network access.
///
/// Listings are scripted as explicit pages; mutations are recorded and can
/// be inspected after the fact. Individual operations can be made to fail
/// to exercise error paths.
pub struct MockHosting {
    pull_pages: Vec<Vec<PullRequestRef>>,
    tag_pages: Vec<Vec<TagRef>>,
    fail_pulls_page: Option<u32>,
    fail_tags_page: Option<u32>,
    fail_release_creation: bool,
    fail_tag_creation: bool,
    fail_asset: Option<String>,
    fail_content_lookup: bool,
    state: Mutex<MockState>,
}

impl MockHosting {
    /// Create a new empty mock with no pull requests, tags, or content
    pub fn new() -> Self {
        MockHosting {
            pull_pages: Vec::new(),
            tag_pages: Vec::new(),
            fail_pulls_page: None,
            fail_tags_page: None,
            fail_release_creation: false,
            fail_tag_creation: false,
            fail_asset: None,
            fail_content_lookup: false,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Append one page to the pulls-for-commit listing
    pub fn add_pull_page(&mut self, pulls: Vec<PullRequestRef>) {
        self.pull_pages.push(pulls);
    }

    /// Append one page to the tag listing
    pub fn add_tag_page(&mut self, tags: Vec<TagRef>) {
        self.tag_pages.push(tags);
    }

    /// Append a single-page tag listing from tag names
    pub fn add_tags(&mut self, names: &[&str]) {
        self.add_tag_page(
            names
                .iter()
                .map(|n| TagRef {
                    name: n.to_string(),
                })
                .collect(),
        );
    }

    /// Make the pulls listing fail when the given page is requested
    pub fn fail_pulls_on_page(&mut self, page: u32) {
        self.fail_pulls_page = Some(page);
    }

    /// Make the tag listing fail when the given page is requested
    pub fn fail_tags_on_page(&mut self, page: u32) {
        self.fail_tags_page = Some(page);
    }

    /// Make release creation fail
    pub fn fail_release_creation(&mut self) {
        self.fail_release_creation = true;
    }

    /// Make tag object creation fail
    pub fn fail_tag_creation(&mut self) {
        self.fail_tag_creation = true;
    }

    /// Make the upload of the named asset fail
    pub fn fail_asset(&mut self, name: impl Into<String>) {
        self.fail_asset = Some(name.into());
    }

    /// Make content lookup fail with a non-404 error
    pub fn fail_content_lookup(&mut self) {
        self.fail_content_lookup = true;
    }

    /// Seed existing file content at a path
    pub fn seed_content(&mut self, path: impl Into<String>, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.commit_seq += 1;
        let sha = format!("blob-{:04}", state.commit_seq);
        state.contents.insert(
            path.into(),
            StoredContent {
                sha,
                content: content.to_vec(),
            },
        );
    }

    /// Releases created so far
    pub fn created_releases(&self) -> Vec<CreatedRelease> {
        self.state.lock().unwrap().releases.clone()
    }

    /// Annotated tag objects created so far
    pub fn created_tag_objects(&self) -> Vec<CreatedTagObject> {
        self.state.lock().unwrap().tag_objects.clone()
    }

    /// Assets uploaded so far
    pub fn uploaded_assets(&self) -> Vec<UploadedAsset> {
        self.state.lock().unwrap().assets.clone()
    }

    /// Current content at a path, if any
    pub fn content_at(&self, path: &str) -> Option<StoredContent> {
        self.state.lock().unwrap().contents.get(path).cloned()
    }

    fn list_page<T: Clone>(pages: &[Vec<T>], page: u32) -> Page<T> {
        let index = page.saturating_sub(1) as usize;
        let items = pages.get(index).cloned().unwrap_or_default();
        let next_page = if (index + 1) < pages.len() {
            Some(page + 1)
        } else {
            None
        };
        Page { items, next_page }
    }
}

impl Default for MockHosting {
    fn default() -> Self {
        Self::new()
    }
}

impl HostingApi for MockHosting {
    fn pulls_for_commit_page(
        &self,
        _owner: &str,
        _repo: &str,
        _sha: &str,
        page: u32,
    ) -> Result<Page<PullRequestRef>> {
        if self.fail_pulls_page == Some(page) {
            return Err(GhPublishError::api(format!(
                "pull request page {} unavailable",
                page
            )));
        }
        Ok(Self::list_page(&self.pull_pages, page))
    }

    fn tags_page(&self, _owner: &str, _repo: &str, page: u32) -> Result<Page<TagRef>> {
        if self.fail_tags_page == Some(page) {
            return Err(GhPublishError::api(format!(
                "tag page {} unavailable",
                page
            )));
        }
        Ok(Self::list_page(&self.tag_pages, page))
    }

    fn create_release(
        &self,
        _owner: &str,
        _repo: &str,
        tag: &str,
        target_commit: &str,
        name: &str,
    ) -> Result<ReleaseId> {
        if self.fail_release_creation {
            return Err(GhPublishError::release_creation("release rejected"));
        }

        let mut state = self.state.lock().unwrap();
        let id = ReleaseId(state.releases.len() as u64 + 1);
        state.releases.push(CreatedRelease {
            id,
            tag: tag.to_string(),
            target_commit: target_commit.to_string(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn create_tag_object(
        &self,
        _owner: &str,
        _repo: &str,
        tag: &str,
        sha: &str,
        message: &str,
    ) -> Result<()> {
        if self.fail_tag_creation {
            return Err(GhPublishError::release_creation("tag object rejected"));
        }

        let mut state = self.state.lock().unwrap();
        state.tag_objects.push(CreatedTagObject {
            tag: tag.to_string(),
            sha: sha.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn upload_release_asset(
        &self,
        _owner: &str,
        _repo: &str,
        release: ReleaseId,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        if self.fail_asset.as_deref() == Some(name) {
            return Err(GhPublishError::asset_upload(format!(
                "upload of {} rejected",
                name
            )));
        }

        let mut state = self.state.lock().unwrap();
        state.assets.push(UploadedAsset {
            release,
            name: name.to_string(),
            content: content.to_vec(),
        });
        Ok(())
    }

    fn get_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _branch: Option<&str>,
    ) -> Result<Option<ContentInfo>> {
        if self.fail_content_lookup {
            return Err(GhPublishError::content_lookup("lookup unavailable"));
        }

        let state = self.state.lock().unwrap();
        Ok(state
            .contents
            .get(path)
            .map(|c| ContentInfo { sha: c.sha.clone() }))
    }

    fn put_content(&self, req: &FileUpsertRequest, base_revision: Option<&str>) -> Result<String> {
        let mut state = self.state.lock().unwrap();

        // The service accepts a base revision exactly when it matches the
        // current content; creation against existing content, updates
        // without a revision, and stale revisions are all rejected.
        match (state.contents.get(&req.path), base_revision) {
            (Some(current), Some(revision)) if current.sha == revision => {}
            (Some(_), Some(revision)) => {
                return Err(GhPublishError::file_commit(format!(
                    "revision {} does not match current content",
                    revision
                )));
            }
            (Some(_), None) => {
                return Err(GhPublishError::file_commit(
                    "content already exists and no base revision was supplied",
                ));
            }
            (None, Some(revision)) => {
                return Err(GhPublishError::file_commit(format!(
                    "base revision {} supplied for a path with no content",
                    revision
                )));
            }
            (None, None) => {}
        }

        state.commit_seq += 1;
        let blob_sha = format!("blob-{:04}", state.commit_seq);
        let commit_sha = format!("commit-{:04}", state.commit_seq);
        state.contents.insert(
            req.path.clone(),
            StoredContent {
                sha: blob_sha,
                content: req.content.clone(),
            },
        );
        Ok(commit_sha)
    }
}
