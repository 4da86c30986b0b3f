//! Error types for the star scanning pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, StarScanError>;

/// Error types for catalog fetching, downloading, and analysis
#[derive(Error, Debug)]
pub enum StarScanError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or decoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP transport errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Catalog API returned an unusable response
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A single image download failed
    #[error("Download error: {0}")]
    Download(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StarScanError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new download error
    pub fn download<S: Into<String>>(msg: S) -> Self {
        Self::Download(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a catalog error for a non-success HTTP status
    pub fn catalog_status(status: reqwest::StatusCode) -> Self {
        Self::Catalog(format!("catalog request failed with HTTP {status}"))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {operation} '{path_display}': {error}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = StarScanError::invalid_config("count must be at least 1");
        assert!(matches!(err, StarScanError::InvalidConfig(_)));

        let err = StarScanError::catalog("response was not a JSON array");
        assert!(matches!(err, StarScanError::Catalog(_)));

        let err = StarScanError::download("HTTP 404 for space_2.jpg");
        assert!(matches!(err, StarScanError::Download(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StarScanError::invalid_config("api key cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: api key cannot be empty"
        );

        let err = StarScanError::catalog_status(reqwest::StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_file_io_error_context() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StarScanError::file_io_error("create directory", "/tmp/raw", &io_err);

        let msg = err.to_string();
        assert!(msg.contains("create directory"));
        assert!(msg.contains("/tmp/raw"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StarScanError = io_err.into();
        assert!(matches!(err, StarScanError::Io(_)));
    }
}
