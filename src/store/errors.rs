//! Store error types
//!
//! Error codes:
//! - BLOG_STORE_IO_ERROR (ERROR severity)
//! - BLOG_STORE_WRITE_FAILED (ERROR severity)
//! - BLOG_STORE_READ_FAILED (ERROR severity)
//! - BLOG_STORE_ENCODE_FAILED (ERROR severity)
//! - BLOG_DATA_CORRUPTION (FATAL severity)
//! - BLOG_CONFIG_INVALID (FATAL severity)
//! - BLOG_RECORD_NOT_FOUND (REJECT severity)
//! - BLOG_INVALID_RECORD (REJECT severity)

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::config::ConfigError;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, store untouched
    Reject,
    /// Operation fails, process continues
    Error,
    /// Store cannot be trusted, process should terminate
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable error codes surfaced to callers and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Filesystem failure outside a read or write of the store file
    IoError,
    /// Store file could not be written
    WriteFailed,
    /// Store file could not be read
    ReadFailed,
    /// Document could not be encoded
    EncodeFailed,
    /// Store file failed framing or checksum verification
    DataCorruption,
    /// Store configuration rejected
    ConfigInvalid,
    /// Update targeted an id with no record
    RecordNotFound,
    /// Record would violate the persisted-record invariants
    InvalidRecord,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::IoError => "BLOG_STORE_IO_ERROR",
            StoreErrorCode::WriteFailed => "BLOG_STORE_WRITE_FAILED",
            StoreErrorCode::ReadFailed => "BLOG_STORE_READ_FAILED",
            StoreErrorCode::EncodeFailed => "BLOG_STORE_ENCODE_FAILED",
            StoreErrorCode::DataCorruption => "BLOG_DATA_CORRUPTION",
            StoreErrorCode::ConfigInvalid => "BLOG_CONFIG_INVALID",
            StoreErrorCode::RecordNotFound => "BLOG_RECORD_NOT_FOUND",
            StoreErrorCode::InvalidRecord => "BLOG_INVALID_RECORD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::IoError
            | StoreErrorCode::WriteFailed
            | StoreErrorCode::ReadFailed
            | StoreErrorCode::EncodeFailed => Severity::Error,
            StoreErrorCode::DataCorruption | StoreErrorCode::ConfigInvalid => Severity::Fatal,
            StoreErrorCode::RecordNotFound | StoreErrorCode::InvalidRecord => Severity::Reject,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("[ERROR] BLOG_STORE_IO_ERROR: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("[ERROR] BLOG_STORE_WRITE_FAILED: {message}")]
    WriteFailed {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("[ERROR] BLOG_STORE_READ_FAILED: {message}")]
    ReadFailed {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("[ERROR] BLOG_STORE_ENCODE_FAILED: {message}")]
    EncodeFailed { message: String },

    #[error("[FATAL] BLOG_DATA_CORRUPTION: {reason} (path: {})", .path.display())]
    DataCorruption { path: PathBuf, reason: String },

    #[error("[FATAL] BLOG_CONFIG_INVALID: {0}")]
    Config(#[from] ConfigError),

    #[error("[REJECT] BLOG_RECORD_NOT_FOUND: no record with id '{id}'")]
    RecordNotFound { id: String },

    #[error("[REJECT] BLOG_INVALID_RECORD: {reason}")]
    InvalidRecord { reason: String },
}

impl StoreError {
    /// Create a filesystem error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::WriteFailed {
            message: message.into(),
            source,
        }
    }

    /// Create a read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailed {
            message: message.into(),
            source,
        }
    }

    /// Create an encode failure
    pub fn encode_failed(message: impl Into<String>) -> Self {
        Self::EncodeFailed {
            message: message.into(),
        }
    }

    /// Create a data corruption error (FATAL)
    pub fn data_corruption(path: &Path, reason: impl Into<String>) -> Self {
        Self::DataCorruption {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a not-found rejection for an update target
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Create an invalid-record rejection
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        match self {
            StoreError::Io { .. } => StoreErrorCode::IoError,
            StoreError::WriteFailed { .. } => StoreErrorCode::WriteFailed,
            StoreError::ReadFailed { .. } => StoreErrorCode::ReadFailed,
            StoreError::EncodeFailed { .. } => StoreErrorCode::EncodeFailed,
            StoreError::DataCorruption { .. } => StoreErrorCode::DataCorruption,
            StoreError::Config(_) => StoreErrorCode::ConfigInvalid,
            StoreError::RecordNotFound { .. } => StoreErrorCode::RecordNotFound,
            StoreError::InvalidRecord { .. } => StoreErrorCode::InvalidRecord,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns whether this error is fatal (the caller should stop using the store)
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
