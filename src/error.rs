//! Error types for Solidafy Pager
//!
//! Two layers live here. [`PageError`] covers failures tied to a single
//! page request (malformed response, failed fetch) and is delivered to the
//! subscriber of that page. [`Error`] is the crate-wide error returned by
//! configuration loading, the CLI and anything else outside a page request.

use crate::types::PageKey;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by a caller-supplied request function
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single page request
///
/// Cloneable so one in-flight fetch can report the same outcome to every
/// subscriber waiting on it.
#[derive(Error, Debug, Clone)]
pub enum PageError {
    #[error("Invalid page response field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Fetching page {page} failed: {source}")]
    Fetch {
        page: PageKey,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Request for page {page} was cancelled")]
    Cancelled { page: PageKey },
}

impl PageError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a fetch error from whatever the request function failed with
    pub fn fetch(page: PageKey, source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            page,
            source: Arc::from(source.into()),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a fetch error
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// The main error type for Solidafy Pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Page Errors
    // ============================================================================
    #[error(transparent)]
    Page(#[from] PageError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Check if this error came from a page request
    pub fn is_page_error(&self) -> bool {
        matches!(self, Error::Page(_))
    }
}

/// Result type alias for Solidafy Pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
