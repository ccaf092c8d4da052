//! Error types
//!
//! Crate-level `ApiError` returned by CLI commands, plus the domain errors it
//! wraps: catalog preconditions, metadata parsing and remote API failures.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for command execution
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Errors that abort a whole catalog scan
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no `images` directory; raised before any folder is visited.
    #[error("Eagle catalog 'images' directory not found: {}", .0.display())]
    ImagesDirMissing(PathBuf),

    #[error("Failed to list catalog directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to build scan worker pool: {0}")]
    WorkerPool(String),
}

/// Failure to turn a `metadata.json` descriptor into a typed record
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metadata root must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Failure talking to the Eagle or Immich HTTP APIs
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-2xx response
    #[error("HTTP {status} error: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose envelope status is not "success"
    #[error("API returned status: {0}")]
    Status(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_dir_missing_names_path() {
        let err = CatalogError::ImagesDirMissing(PathBuf::from("/lib/My.library/images"));
        assert!(err.to_string().contains("/lib/My.library/images"));
    }

    #[test]
    fn test_remote_http_error_carries_status_and_body() {
        let err = RemoteError::Http {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 error: not found");
    }

    #[test]
    fn test_api_error_wraps_domain_errors() {
        let err: ApiError = RemoteError::Status("error".to_string()).into();
        assert!(matches!(err, ApiError::Remote(RemoteError::Status(_))));
        assert_eq!(err.to_string(), "API returned status: error");
    }
}
