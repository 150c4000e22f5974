use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GhPublishError, Result};
use crate::version::Version;

/// Represents the complete configuration for gh-publish.
///
/// Contains API endpoints, the committer identity used for file commits,
/// and release formatting options.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub committer: CommitterConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Configuration for the hosting API endpoints.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upload_url() -> String {
    "https://uploads.github.com".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            upload_url: default_upload_url(),
        }
    }
}

/// Committer identity recorded on file commits.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CommitterConfig {
    #[serde(default = "default_committer_name")]
    pub name: String,

    #[serde(default = "default_committer_email")]
    pub email: String,
}

fn default_committer_name() -> String {
    "gh-publish".to_string()
}

fn default_committer_email() -> String {
    "gh-publish@localhost".to_string()
}

impl Default for CommitterConfig {
    fn default() -> Self {
        CommitterConfig {
            name: default_committer_name(),
            email: default_committer_email(),
        }
    }
}

/// Configuration for release and commit formatting.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReleaseConfig {
    /// Tag naming pattern; must contain the `{version}` placeholder
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Default commit message for file upserts
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_commit_message() -> String {
    "chore: update generated file".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_pattern: default_tag_pattern(),
            commit_message: default_commit_message(),
        }
    }
}

impl ReleaseConfig {
    /// Formats a version as a tag name according to the configured pattern.
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format_tag(&self, version: &Version) -> String {
        self.tag_pattern.replace("{version}", &version.to_string())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `ghpublish.toml` in current directory
/// 3. `~/.config/.ghpublish.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./ghpublish.toml").exists() {
        fs::read_to_string("./ghpublish.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".ghpublish.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GhPublishError::config(format!("invalid configuration file: {}", e)))?;

    if !config.release.tag_pattern.contains("{version}") {
        return Err(GhPublishError::config(
            "tag_pattern must contain the {version} placeholder",
        ));
    }

    Ok(config)
}
