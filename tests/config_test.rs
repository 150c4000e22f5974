// tests/config_test.rs
use gh_publish::config::{load_config, Config};
use gh_publish::version::Version;
use gh_publish::GhPublishError;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "https://api.github.com");
    assert_eq!(config.api.upload_url, "https://uploads.github.com");
    assert_eq!(config.committer.name, "gh-publish");
    assert_eq!(config.committer.email, "gh-publish@localhost");
    assert_eq!(config.release.tag_pattern, "v{version}");
    assert_eq!(config.release.commit_message, "chore: update generated file");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[api]
base_url = "https://github.example.com/api/v3"

[committer]
name = "release-bot"
email = "release-bot@example.com"

[release]
tag_pattern = "release-{version}"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.api.base_url, "https://github.example.com/api/v3");
    // Unset fields keep their defaults.
    assert_eq!(config.api.upload_url, "https://uploads.github.com");
    assert_eq!(config.committer.name, "release-bot");
    assert_eq!(config.release.tag_pattern, "release-{version}");
}

#[test]
fn test_format_tag_applies_pattern() {
    let config = Config::default();
    assert_eq!(
        config.release.format_tag(&Version::new(1, 2, 3)),
        "v1.2.3"
    );

    let mut config = Config::default();
    config.release.tag_pattern = "release-{version}".to_string();
    assert_eq!(
        config.release.format_tag(&Version::new(0, 4, 0)),
        "release-0.4.0"
    );
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[api\nbase_url = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, GhPublishError::Config(_)));
}

#[test]
fn test_tag_pattern_without_placeholder_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[release]\ntag_pattern = \"v1.0.0\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, GhPublishError::Config(_)));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    assert!(load_config(Some("/does/not/exist/ghpublish.toml")).is_err());
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ghpublish.toml"),
        "[committer]\nname = \"local-bot\"\n",
    )
    .unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let config = load_config(None).unwrap();

    std::env::set_current_dir(original_dir).unwrap();
    assert_eq!(config.committer.name, "local-bot");
}
