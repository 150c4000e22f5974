// tests/resolver_test.rs
use gh_publish::hosting::{MockHosting, PullRequestRef, TagRef};
use gh_publish::resolver::{resolve_next_version, NoReleaseReason, Resolution};
use gh_publish::version::Version;
use gh_publish::GhPublishError;

fn pull(number: u64, labels: &[&str]) -> PullRequestRef {
    PullRequestRef {
        number,
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

fn tag(name: &str) -> TagRef {
    TagRef {
        name: name.to_string(),
    }
}

#[test]
fn test_maximum_tag_wins_and_unparsable_tags_are_ignored() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(3, &["patch"])]);
    api.add_tags(&["v1.2.0", "notaversion", "v1.3.0"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    // Baseline 1.3.0, bumped at patch level.
    assert_eq!(resolution, Resolution::Release(Version::new(1, 3, 1)));
}

#[test]
fn test_commit_without_pulls_is_not_release_eligible() {
    let mut api = MockHosting::new();
    api.add_tags(&["v9.9.9"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(
        resolution,
        Resolution::NoRelease(NoReleaseReason::NoAssociatedPulls)
    );
}

#[test]
fn test_highest_numbered_pull_decides_the_bump() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(5, &["patch"]), pull(9, &["major"])]);
    api.add_tags(&["v1.1.2"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(2, 0, 0)));
}

#[test]
fn test_lower_numbered_pull_labels_never_contribute() {
    let mut api = MockHosting::new();
    // The stronger label sits on the older pull request and must lose.
    api.add_pull_page(vec![pull(5, &["major"]), pull(9, &["patch"])]);
    api.add_tags(&["v1.1.2"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(1, 1, 3)));
}

#[test]
fn test_pull_with_multiple_labels_bumps_at_the_maximum() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(7, &["patch", "minor"])]);
    api.add_tags(&["v1.0.0"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(1, 1, 0)));
}

#[test]
fn test_unlabeled_deciding_pull_means_no_release() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(5, &["major"]), pull(9, &["enhancement"])]);
    api.add_tags(&["v1.0.0"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(
        resolution,
        Resolution::NoRelease(NoReleaseReason::NoPrecedenceLabel { pr_number: 9 })
    );
}

#[test]
fn test_no_tags_starts_from_zero_baseline() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(1, &["patch"])]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(0, 0, 1)));
}

#[test]
fn test_only_unparsable_tags_starts_from_zero_baseline() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(1, &["minor"])]);
    api.add_tags(&["nightly", "release-candidate"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(0, 1, 0)));
}

#[test]
fn test_pull_listing_is_drained_across_all_pages() {
    let mut api = MockHosting::new();
    // 3 pages of 2 pull requests each; the deciding one sits on the last page.
    api.add_pull_page(vec![pull(1, &["major"]), pull(2, &[])]);
    api.add_pull_page(vec![pull(3, &[]), pull(4, &["major"])]);
    api.add_pull_page(vec![pull(5, &[]), pull(6, &["minor"])]);
    api.add_tags(&["v2.3.4"]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(2, 4, 0)));
}

#[test]
fn test_tag_listing_is_drained_across_all_pages() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(1, &["patch"])]);
    // The maximum version sits on the second page.
    api.add_tag_page(vec![tag("v1.0.0"), tag("v1.1.0")]);
    api.add_tag_page(vec![tag("v1.9.0"), tag("v1.2.0")]);

    let resolution = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(resolution, Resolution::Release(Version::new(1, 9, 1)));
}

#[test]
fn test_pull_fetch_error_aborts_resolution() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(1, &["major"])]);
    api.add_pull_page(vec![pull(2, &["major"])]);
    api.fail_pulls_on_page(2);
    api.add_tags(&["v1.0.0"]);

    let err = resolve_next_version(&api, "o", "r", "sha").unwrap_err();
    assert!(matches!(err, GhPublishError::Api(_)));
}

#[test]
fn test_tag_fetch_error_aborts_resolution() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(1, &["major"])]);
    api.add_tag_page(vec![tag("v1.0.0")]);
    api.add_tag_page(vec![tag("v2.0.0")]);
    api.fail_tags_on_page(2);

    let err = resolve_next_version(&api, "o", "r", "sha").unwrap_err();
    assert!(matches!(err, GhPublishError::Api(_)));
}

#[test]
fn test_resolution_is_deterministic() {
    let mut api = MockHosting::new();
    api.add_pull_page(vec![pull(5, &["patch"]), pull(9, &["minor"])]);
    api.add_tags(&["v0.4.1", "junk", "v0.3.0"]);

    let first = resolve_next_version(&api, "o", "r", "sha").unwrap();
    let second = resolve_next_version(&api, "o", "r", "sha").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Resolution::Release(Version::new(0, 5, 0)));
}
