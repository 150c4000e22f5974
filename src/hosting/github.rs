use std::time::Duration;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{GhPublishError, Result};
use crate::hosting::{
    ContentInfo, FileUpsertRequest, HostingApi, Page, PullRequestRef, ReleaseId, TagRef,
};

/// Default API endpoint for GitHub
pub const GITHUB_API: &str = "https://api.github.com";

/// Default endpoint for release asset uploads
pub const GITHUB_UPLOADS: &str = "https://uploads.github.com";

/// Default timeout for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent for API requests
pub const USER_AGENT: &str = concat!("gh-publish/", env!("CARGO_PKG_VERSION"));

/// Page size requested for paginated listings
const PER_PAGE: u32 = 100;

/// GitHub REST API client.
///
/// Carries the bearer credential explicitly; there is no process-wide
/// authentication state. Construct one per call chain and thread it through
/// each component's entry point.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: String,
    upload_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl GithubClient {
    /// Creates a client authenticated with the given token.
    ///
    /// # Returns
    /// * `Ok(GithubClient)` - Ready-to-use client
    /// * `Err` - `Auth` if the token is empty; a token the service rejects
    ///   surfaces as `Auth` on the first request instead
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GhPublishError::auth("no API token provided"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GhPublishError::api(format!("failed to build HTTP client: {}", e)))?;

        Ok(GithubClient {
            base_url: GITHUB_API.to_string(),
            upload_url: GITHUB_UPLOADS.to_string(),
            token,
            client,
        })
    }

    /// Override the API base URL (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the asset upload base URL.
    pub fn with_upload_url(mut self, upload_url: &str) -> Self {
        self.upload_url = upload_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| GhPublishError::api(format!("request to {} failed: {}", url, e)))?;
        self.reject_unauthorized(response)
    }

    fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .send()
            .map_err(|e| GhPublishError::api(format!("request to {} failed: {}", url, e)))?;
        self.reject_unauthorized(response)
    }

    fn put_json<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .send()
            .map_err(|e| GhPublishError::api(format!("request to {} failed: {}", url, e)))?;
        self.reject_unauthorized(response)
    }

    fn reject_unauthorized(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response> {
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GhPublishError::auth("token rejected by the service"));
        }
        Ok(response)
    }
}

/// Extracts the next page number from a `Link` response header.
///
/// The header lists related pages as `<url>; rel="kind"` entries separated
/// by commas; the continuation is the entry with `rel="next"`. Returns
/// `None` when the header is absent or carries no next entry, which
/// terminates the pagination walk.
fn next_page_from_link(link: Option<&str>) -> Option<u32> {
    let link = link?;

    for entry in link.split(',') {
        let mut pieces = entry.splitn(2, ';');
        let target = pieces.next().unwrap_or("").trim();
        let rel = pieces.next().unwrap_or("");
        if !rel.contains("rel=\"next\"") {
            continue;
        }

        let url = target.trim_start_matches('<').trim_end_matches('>');
        let Some(query) = url.splitn(2, '?').nth(1) else {
            continue;
        };
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("page=") {
                return value.parse().ok();
            }
        }
    }

    None
}

fn link_header(response: &reqwest::blocking::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LINK)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    #[serde(default)]
    labels: Vec<LabelResponse>,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    commit: CommitResponse,
}

#[derive(Debug, Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct TagObjectBody<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    object_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CommitterBody<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    committer: CommitterBody<'a>,
}

impl HostingApi for GithubClient {
    fn pulls_for_commit_page(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        page: u32,
    ) -> Result<Page<PullRequestRef>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/pulls?per_page={}&page={}",
            self.base_url, owner, repo, sha, PER_PAGE, page
        );

        let response = self.get(&url)?;
        if !response.status().is_success() {
            return Err(GhPublishError::api(format!(
                "failed to list pull requests for commit {}: status {}",
                sha,
                response.status()
            )));
        }

        let next_page = next_page_from_link(link_header(&response).as_deref());
        let pulls: Vec<PullResponse> = response
            .json()
            .map_err(|e| GhPublishError::api(format!("failed to parse pull request list: {}", e)))?;

        Ok(Page {
            items: pulls
                .into_iter()
                .map(|p| PullRequestRef {
                    number: p.number,
                    labels: p.labels.into_iter().map(|l| l.name).collect(),
                })
                .collect(),
            next_page,
        })
    }

    fn tags_page(&self, owner: &str, repo: &str, page: u32) -> Result<Page<TagRef>> {
        let url = format!(
            "{}/repos/{}/{}/tags?per_page={}&page={}",
            self.base_url, owner, repo, PER_PAGE, page
        );

        let response = self.get(&url)?;
        if !response.status().is_success() {
            return Err(GhPublishError::api(format!(
                "failed to list tags: status {}",
                response.status()
            )));
        }

        let next_page = next_page_from_link(link_header(&response).as_deref());
        let tags: Vec<TagResponse> = response
            .json()
            .map_err(|e| GhPublishError::api(format!("failed to parse tag list: {}", e)))?;

        Ok(Page {
            items: tags.into_iter().map(|t| TagRef { name: t.name }).collect(),
            next_page,
        })
    }

    fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target_commit: &str,
        name: &str,
    ) -> Result<ReleaseId> {
        let url = format!("{}/repos/{}/{}/releases", self.base_url, owner, repo);
        let body = CreateReleaseBody {
            tag_name: tag,
            target_commitish: target_commit,
            name,
        };

        let response = self
            .post_json(&url, &body)
            .map_err(release_creation_context)?;
        if !response.status().is_success() {
            return Err(GhPublishError::release_creation(format!(
                "failed to create release for tag {}: status {}",
                tag,
                response.status()
            )));
        }

        let release: ReleaseResponse = response.json().map_err(|e| {
            GhPublishError::release_creation(format!("failed to parse release response: {}", e))
        })?;
        Ok(ReleaseId(release.id))
    }

    fn create_tag_object(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        sha: &str,
        message: &str,
    ) -> Result<()> {
        let url = format!("{}/repos/{}/{}/git/tags", self.base_url, owner, repo);
        let body = TagObjectBody {
            tag,
            message,
            object: sha,
            object_type: "commit",
        };

        let response = self
            .post_json(&url, &body)
            .map_err(release_creation_context)?;
        if !response.status().is_success() {
            return Err(GhPublishError::release_creation(format!(
                "failed to create tag object {}: status {}",
                tag,
                response.status()
            )));
        }

        Ok(())
    }

    fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release: ReleaseId,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets?name={}",
            self.upload_url, owner, repo, release.0, name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/octet-stream")
            .body(content.to_vec())
            .send()
            .map_err(|e| {
                GhPublishError::asset_upload(format!("request to {} failed: {}", url, e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GhPublishError::auth("token rejected by the service"));
        }
        if !response.status().is_success() {
            return Err(GhPublishError::asset_upload(format!(
                "failed to upload asset {}: status {}",
                name,
                response.status()
            )));
        }

        Ok(())
    }

    fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Option<ContentInfo>> {
        let mut url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, owner, repo, path
        );
        if let Some(branch) = branch {
            url.push_str(&format!("?ref={}", branch));
        }

        let response = self.get(&url).map_err(content_lookup_context)?;
        // The not-found condition is the create case, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GhPublishError::content_lookup(format!(
                "failed to read content at {}: status {}",
                path,
                response.status()
            )));
        }

        let content: ContentResponse = response.json().map_err(|e| {
            GhPublishError::content_lookup(format!("failed to parse content response: {}", e))
        })?;
        Ok(Some(ContentInfo { sha: content.sha }))
    }

    fn put_content(&self, req: &FileUpsertRequest, base_revision: Option<&str>) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, req.owner, req.repo, req.path
        );
        let body = PutContentBody {
            message: &req.message,
            content: base64::engine::general_purpose::STANDARD.encode(&req.content),
            sha: base_revision,
            branch: req.branch.as_deref(),
            committer: CommitterBody {
                name: &req.committer.name,
                email: &req.committer.email,
            },
        };

        let response = self.put_json(&url, &body).map_err(file_commit_context)?;
        if !response.status().is_success() {
            return Err(GhPublishError::file_commit(format!(
                "failed to commit content at {}: status {}",
                req.path,
                response.status()
            )));
        }

        let committed: PutContentResponse = response.json().map_err(|e| {
            GhPublishError::file_commit(format!("failed to parse commit response: {}", e))
        })?;
        Ok(committed.commit.sha)
    }
}

// Transport errors from the shared helpers arrive as the generic API
// variant; these remap them to the failing operation's kind while leaving
// authentication rejections untouched.

fn release_creation_context(err: GhPublishError) -> GhPublishError {
    match err {
        GhPublishError::Api(msg) => GhPublishError::ReleaseCreation(msg),
        other => other,
    }
}

fn content_lookup_context(err: GhPublishError) -> GhPublishError {
    match err {
        GhPublishError::Api(msg) => GhPublishError::ContentLookup(msg),
        other => other,
    }
}

fn file_commit_context(err: GhPublishError) -> GhPublishError {
    match err {
        GhPublishError::Api(msg) => GhPublishError::FileCommit(msg),
        other => other,
    }
}
