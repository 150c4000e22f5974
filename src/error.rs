use thiserror::Error;

/// Unified error type for gh-publish operations
#[derive(Error, Debug)]
pub enum GhPublishError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Hosting API request failed: {0}")]
    Api(String),

    #[error("Release creation failed: {0}")]
    ReleaseCreation(String),

    #[error("Asset upload failed: {0}")]
    AssetUpload(String),

    #[error("Content lookup failed: {0}")]
    ContentLookup(String),

    #[error("File commit failed: {0}")]
    FileCommit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gh-publish
pub type Result<T> = std::result::Result<T, GhPublishError>;

impl GhPublishError {
    /// Create an authentication error with context
    pub fn auth(msg: impl Into<String>) -> Self {
        GhPublishError::Auth(msg.into())
    }

    /// Create a generic API error with context
    pub fn api(msg: impl Into<String>) -> Self {
        GhPublishError::Api(msg.into())
    }

    /// Create a release creation error with context
    pub fn release_creation(msg: impl Into<String>) -> Self {
        GhPublishError::ReleaseCreation(msg.into())
    }

    /// Create an asset upload error with context
    pub fn asset_upload(msg: impl Into<String>) -> Self {
        GhPublishError::AssetUpload(msg.into())
    }

    /// Create a content lookup error with context
    pub fn content_lookup(msg: impl Into<String>) -> Self {
        GhPublishError::ContentLookup(msg.into())
    }

    /// Create a file commit error with context
    pub fn file_commit(msg: impl Into<String>) -> Self {
        GhPublishError::FileCommit(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GhPublishError::Config(msg.into())
    }
}
