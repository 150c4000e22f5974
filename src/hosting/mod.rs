//! Hosting API abstraction layer
//!
//! This module provides a trait-based abstraction over the source-hosting
//! REST API, allowing for multiple implementations including the real
//! GitHub client and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [HostingApi] trait, which defines the API
//! operations gh-publish needs. The concrete implementations include:
//!
//! - [github::GithubClient]: A real implementation over HTTPS
//! - [mock::MockHosting]: A mock implementation for testing
//!
//! Most code should depend on the [HostingApi] trait rather than concrete
//! implementations to enable easy testing and flexibility. Paginated
//! listings are exposed one page at a time; [paginate] turns a page fetcher
//! into a lazy item sequence.

pub mod github;
pub mod mock;

pub use github::GithubClient;
pub use mock::MockHosting;

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::error::Result;

/// A pull request associated with a commit, as reported by the hosting API.
///
/// Fetched fresh for every resolution; never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Hosting-assigned number, monotonically increasing per repository
    pub number: u64,
    /// Label names attached to the pull request
    pub labels: Vec<String>,
}

/// A tag as listed by the hosting service.
///
/// Names that do not parse as a semantic version stay in the raw listing
/// but are excluded from version arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
}

/// Identifier of a created release, used to address asset uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseId(pub u64);

/// Revision metadata for existing content at a repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    /// Revision identifier the API requires to accept an update
    pub sha: String,
}

/// One page of a paginated listing.
///
/// `next_page = None` terminates the walk.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

/// Committer identity recorded on file commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Request to publish a release.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub owner: String,
    pub repo: String,
    pub tag: String,
    pub target_commit: String,
    /// Display name; defaults to the tag when absent
    pub name: Option<String>,
    /// Directory whose direct file entries become release assets
    pub assets: Option<PathBuf>,
}

/// Request to create-or-update a single file on a branch.
///
/// The base revision is resolved by the upserter, never supplied here.
#[derive(Debug, Clone)]
pub struct FileUpsertRequest {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub content: Vec<u8>,
    pub message: String,
    pub committer: Committer,
    /// Target branch; the repository default branch when absent
    pub branch: Option<String>,
}

/// Common hosting API trait for abstraction
///
/// This trait abstracts the hosting service operations to allow for multiple
/// implementations including the real GitHub client and mock implementations
/// for testing.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// transport and status failures to the appropriate
/// [crate::error::GhPublishError] variant for the operation; the only
/// recovered condition is the not-found case on [HostingApi::get_content],
/// which is `Ok(None)`.
pub trait HostingApi: Send + Sync {
    /// Get one page of pull requests associated with a commit.
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `sha` - Full commit SHA the pull requests are associated with
    /// * `page` - 1-based page number
    fn pulls_for_commit_page(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        page: u32,
    ) -> Result<Page<PullRequestRef>>;

    /// Get one page of the repository's tags.
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `page` - 1-based page number
    fn tags_page(&self, owner: &str, repo: &str, page: u32) -> Result<Page<TagRef>>;

    /// Create a release bound to a tag name and target commit.
    ///
    /// Returns the identifier asset uploads are addressed to.
    fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target_commit: &str,
        name: &str,
    ) -> Result<ReleaseId>;

    /// Create an annotated tag object at a commit.
    ///
    /// Done separately from [HostingApi::create_release] because release
    /// creation alone does not guarantee an annotated (as opposed to
    /// lightweight) tag exists.
    fn create_tag_object(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        sha: &str,
        message: &str,
    ) -> Result<()>;

    /// Upload a named asset to an existing release.
    fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release: ReleaseId,
        name: &str,
        content: &[u8],
    ) -> Result<()>;

    /// Read revision metadata for existing content at a path.
    ///
    /// # Returns
    /// * `Ok(Some(info))` - Content exists on the branch
    /// * `Ok(None)` - The path does not currently exist (the not-found condition)
    /// * `Err` - Any other lookup failure
    fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Option<ContentInfo>>;

    /// Submit an update-or-create request for a file's content.
    ///
    /// `base_revision` must be the current content revision when the file
    /// already exists, and absent when it does not; the service rejects
    /// mismatches, which is what surfaces a lost-update race as an error.
    ///
    /// Returns the new commit's SHA.
    fn put_content(&self, req: &FileUpsertRequest, base_revision: Option<&str>) -> Result<String>;
}

/// Lazy sequence over a paginated listing.
///
/// Produced by [paginate]; yields `Result<T>` item by item, fetching the
/// next page only once the current one is drained. The walk is finite
/// (terminates when a page reports no successor), strictly sequential, and
/// not restartable. A fetch error is yielded once and ends the iteration.
pub struct Paginated<T, F> {
    fetch: F,
    buffered: VecDeque<T>,
    next_page: Option<u32>,
    failed: bool,
}

/// Turns a page fetcher into a lazy item sequence, starting from page 1.
pub fn paginate<T, F>(fetch: F) -> Paginated<T, F>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    Paginated {
        fetch,
        buffered: VecDeque::new(),
        next_page: Some(1),
        failed: false,
    }
}

impl<T, F> Iterator for Paginated<T, F>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }

            let page = self.next_page.take()?;
            match (self.fetch)(page) {
                Ok(fetched) => {
                    self.next_page = fetched.next_page;
                    self.buffered.extend(fetched.items);
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
