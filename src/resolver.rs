//! Next-version resolution from pull request labels
//!
//! Maps a commit to the next semantic version by looking at the precedence
//! labels (`major`, `minor`, `patch`) on the pull requests associated with
//! it. When several pull requests touch the same commit, the most recently
//! opened one (highest number) decides the bump on its own.

use std::fmt;

use crate::error::Result;
use crate::hosting::{paginate, HostingApi, PullRequestRef, TagRef};
use crate::version::{bump_version, parse_version_from_tag, BumpLevel, Version};

/// Outcome of a resolution: either the next version to release, or the
/// reason this commit produces no release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Release(Version),
    NoRelease(NoReleaseReason),
}

/// Why a commit is not release-eligible. Non-fatal; reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoReleaseReason {
    /// No pull request is associated with the commit
    NoAssociatedPulls,
    /// The deciding pull request carries no recognized precedence label
    NoPrecedenceLabel { pr_number: u64 },
}

impl fmt::Display for NoReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoReleaseReason::NoAssociatedPulls => {
                write!(f, "no pull requests are associated with the commit")
            }
            NoReleaseReason::NoPrecedenceLabel { pr_number } => {
                write!(f, "pull request #{} has no release label", pr_number)
            }
        }
    }
}

/// Resolves the next version for a commit from its pull request labels.
///
/// Both the pull request listing and the tag listing are drained to the
/// last page before any computation; a fetch error on either aborts the
/// resolution and no partial listing is ever used. The result depends only
/// on the fetched snapshot, so resolving twice against unchanged repository
/// state returns the same outcome.
///
/// # Arguments
/// * `api` - Hosting API handle
/// * `owner` - Repository owner
/// * `repo` - Repository name
/// * `sha` - Full SHA of the commit to resolve
///
/// # Returns
/// * `Ok(Resolution::Release(version))` - The next version to publish
/// * `Ok(Resolution::NoRelease(reason))` - The commit is not release-eligible
/// * `Err` - Authentication or API failure
pub fn resolve_next_version(
    api: &dyn HostingApi,
    owner: &str,
    repo: &str,
    sha: &str,
) -> Result<Resolution> {
    let pulls: Vec<PullRequestRef> =
        paginate(|page| api.pulls_for_commit_page(owner, repo, sha, page))
            .collect::<Result<_>>()?;

    // The most recently opened pull request decides the bump outright,
    // whatever labels the earlier ones carry.
    let Some(deciding) = pulls.iter().max_by_key(|pr| pr.number) else {
        return Ok(Resolution::NoRelease(NoReleaseReason::NoAssociatedPulls));
    };

    let tags: Vec<TagRef> =
        paginate(|page| api.tags_page(owner, repo, page)).collect::<Result<_>>()?;
    let current = tags
        .iter()
        .filter_map(|t| parse_version_from_tag(&t.name))
        .max()
        .unwrap_or(Version::new(0, 0, 0));

    let level = BumpLevel::from_labels(deciding.labels.iter().map(String::as_str));
    if level == BumpLevel::None {
        return Ok(Resolution::NoRelease(NoReleaseReason::NoPrecedenceLabel {
            pr_number: deciding.number,
        }));
    }

    Ok(Resolution::Release(bump_version(current, level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::MockHosting;

    fn pull(number: u64, labels: &[&str]) -> PullRequestRef {
        PullRequestRef {
            number,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_pulls_means_no_release() {
        let mut api = MockHosting::new();
        api.add_tags(&["v3.0.0"]);

        let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
        assert_eq!(
            resolution,
            Resolution::NoRelease(NoReleaseReason::NoAssociatedPulls)
        );
    }

    #[test]
    fn test_unlabeled_deciding_pull_means_no_release() {
        let mut api = MockHosting::new();
        api.add_pull_page(vec![pull(4, &["major"]), pull(8, &["documentation"])]);
        api.add_tags(&["v1.0.0"]);

        let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
        assert_eq!(
            resolution,
            Resolution::NoRelease(NoReleaseReason::NoPrecedenceLabel { pr_number: 8 })
        );
    }

    #[test]
    fn test_highest_numbered_pull_wins() {
        let mut api = MockHosting::new();
        api.add_pull_page(vec![pull(5, &["patch"]), pull(9, &["major"])]);
        api.add_tags(&["v1.1.2"]);

        let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
        assert_eq!(resolution, Resolution::Release(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_no_release_reason_display() {
        assert_eq!(
            NoReleaseReason::NoAssociatedPulls.to_string(),
            "no pull requests are associated with the commit"
        );
        assert_eq!(
            NoReleaseReason::NoPrecedenceLabel { pr_number: 12 }.to_string(),
            "pull request #12 has no release label"
        );
    }
}
