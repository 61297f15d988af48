//! Error types for cssvar
//!
//! Errors only exist at the boundary of the crate: building a host document,
//! loading options, installing the logger, or a host refusing an access.
//! The variable store never returns them to its callers, it turns them into
//! sentinels and diagnostics instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cssvar operations
#[derive(Error, Debug)]
pub enum CssVarError {
    /// IO errors (reading html, stylesheets, option files)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing/serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Tree-sitter language setup errors
    #[error("Failed to set up tree-sitter language: {message}")]
    TreeSitterLanguage { message: String },

    /// A URL could not be parsed or resolved
    #[error("Invalid URL '{url}'")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A filesystem path could not be turned into a `file:` URL
    #[error("Path cannot be converted to a file URL: {path:?}")]
    InvalidPath { path: PathBuf },

    /// Selector text the host cannot parse
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Style sheet index out of range
    #[error("Style sheet {index} does not exist")]
    UnknownStyleSheet { index: usize },

    /// Rules of a cross-origin style sheet were accessed
    #[error("Security error: rules of cross-origin style sheet {href} cannot be accessed")]
    SecurityError { href: String },

    /// Rules of a style sheet whose content was never loaded were accessed
    #[error("Style sheet {href} has not been loaded")]
    NotLoaded { href: String },

    /// Element handle that does not belong to the document
    #[error("Element does not exist in this document")]
    UnknownElement,
}

/// Result type alias for cssvar operations
pub type CssVarResult<T> = Result<T, CssVarError>;

impl From<std::io::Error> for CssVarError {
    fn from(err: std::io::Error) -> Self {
        CssVarError::Io {
            source: err,
            message: "IO operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for CssVarError {
    fn from(err: serde_json::Error) -> Self {
        CssVarError::Json {
            source: err,
            message: "JSON operation failed".to_string(),
        }
    }
}

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> CssVarResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> CssVarResult<T> {
        self.map_err(|e| CssVarError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Helper trait for converting JSON errors with context
pub trait JsonContext<T> {
    fn with_json_context(self, message: &str) -> CssVarResult<T>;
}

impl<T> JsonContext<T> for Result<T, serde_json::Error> {
    fn with_json_context(self, message: &str) -> CssVarResult<T> {
        self.map_err(|e| CssVarError::Json {
            message: message.to_string(),
            source: e,
        })
    }
}
