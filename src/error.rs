//! Error types with error codes and fix suggestions
//!
//! Error code ranges:
//! - KIT-000-009: Copy errors
//! - KIT-010-019: Config errors
//! - KIT-020-029: Logger errors
//! - KIT-030-039: Crypto errors
//! - KIT-040-049: HTTP errors
//! - KIT-050-059: File/IO errors
//! - KIT-060-069: Conversion errors

use thiserror::Error;

use crate::copier::CopyError;

pub type Result<T> = std::result::Result<T, KitError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum KitError {
    // ═══════════════════════════════════════════
    // COPY ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[KIT-001] {0}")]
    Copy(#[from] CopyError),

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[KIT-010] Config error: {reason}")]
    Config { reason: String },

    #[error("[KIT-011] Unsupported config format: '{format}'")]
    ConfigFormat { format: String },

    // ═══════════════════════════════════════════
    // LOGGER ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[KIT-020] Logger setup failed: {reason}")]
    Logger { reason: String },

    // ═══════════════════════════════════════════
    // CRYPTO ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[KIT-030] Crypto error: {reason}")]
    Crypto { reason: String },

    #[error("[KIT-031] Invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    // ═══════════════════════════════════════════
    // HTTP ERRORS (040-049)
    // ═══════════════════════════════════════════
    #[error("[KIT-040] HTTP status {status}; body={body}; url {url}")]
    HttpStatus {
        status: u16,
        body: String,
        url: String,
    },

    #[error("[KIT-041] HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("[KIT-042] JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════
    // FILE/IO ERRORS (050-059)
    // ═══════════════════════════════════════════
    #[error("[KIT-050] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[KIT-051] File '{path}': {reason}")]
    File { path: String, reason: String },

    #[error("[KIT-052] No '{marker}' found in '{start}' or any parent directory")]
    RootNotFound { start: String, marker: String },

    #[error("[KIT-053] Content type '{detected}' is not allowed")]
    FileTypeNotAllowed { detected: String },

    // ═══════════════════════════════════════════
    // CONVERSION ERRORS (060-069)
    // ═══════════════════════════════════════════
    #[error("[KIT-060] Integer {value} does not fit the target type")]
    IntOverflow { value: String },
}

impl KitError {
    /// Shorthand for [`KitError::Crypto`]
    pub(crate) fn crypto(reason: impl std::fmt::Display) -> Self {
        KitError::Crypto {
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`KitError::Config`]
    pub(crate) fn config(reason: impl std::fmt::Display) -> Self {
        KitError::Config {
            reason: reason.to_string(),
        }
    }

    /// Get the error code (e.g., "KIT-040")
    pub fn code(&self) -> &'static str {
        match self {
            Self::Copy(_) => "KIT-001",
            Self::Config { .. } => "KIT-010",
            Self::ConfigFormat { .. } => "KIT-011",
            Self::Logger { .. } => "KIT-020",
            Self::Crypto { .. } => "KIT-030",
            Self::Base64(_) => "KIT-031",
            Self::HttpStatus { .. } => "KIT-040",
            Self::Http(_) => "KIT-041",
            Self::Json(_) => "KIT-042",
            Self::Io(_) => "KIT-050",
            Self::File { .. } => "KIT-051",
            Self::RootNotFound { .. } => "KIT-052",
            Self::FileTypeNotAllowed { .. } => "KIT-053",
            Self::IntOverflow { .. } => "KIT-060",
        }
    }
}

impl FixSuggestion for KitError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            KitError::Copy(CopyError::StructuralCopy { .. }) => {
                Some("Align the field types or copy without strict mode")
            }
            KitError::Copy(_) => Some("Check that both values use compatible serde field names"),
            KitError::Config { .. } => Some("Check the config file syntax and field types"),
            KitError::ConfigFormat { .. } => Some("Use one of: toml, yaml, yml, json"),
            KitError::Logger { .. } => {
                Some("Check the log level string and that the log directory is writable")
            }
            KitError::Crypto { .. } => Some("Check key length, IV length and ciphertext encoding"),
            KitError::Base64(_) => Some("Input must be standard base64"),
            KitError::HttpStatus { .. } => Some("Inspect the response body for the server's reason"),
            KitError::Http(_) => Some("Check the URL and network connectivity"),
            KitError::Json(_) => None,
            KitError::Io(_) | KitError::File { .. } => Some("Check file path and permissions"),
            KitError::RootNotFound { .. } => {
                Some("Run from the project root or one of its subdirectories")
            }
            KitError::FileTypeNotAllowed { .. } => Some("Add the detected extension to the accepted list"),
            KitError::IntOverflow { .. } => Some("Use a wider target integer type"),
        }
    }
}
