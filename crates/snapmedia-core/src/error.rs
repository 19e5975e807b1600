//! Shared error type across snapmedia crates.
//!
//! Decoding a payload never produces one of these: absent or malformed fields
//! degrade to "no attachment". Errors are reserved for the outer surfaces
//! (JSON message form, config, stream plumbing, file I/O).

use thiserror::Error;

/// Stable error codes (used in CLI output and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input has the wrong shape (e.g. a Key Ring that is not a byte array).
    BadInput,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Resolving or opening a media stream failed.
    FetchFailed,
    /// Wrapping a media stream with its decryption layer failed.
    DecryptFailed,
    /// File system error.
    Io,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadInput => "BAD_INPUT",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::DecryptFailed => "DECRYPT_FAILED",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SnapMediaError>;

/// Unified error type used by core and cli.
#[derive(Debug, Error)]
pub enum SnapMediaError {
    #[error("bad input: {0}")]
    BadInput(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("decrypt failed: {0}")]
    DecryptFailed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl SnapMediaError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SnapMediaError::BadInput(_) => ErrorCode::BadInput,
            SnapMediaError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            SnapMediaError::FetchFailed(_) => ErrorCode::FetchFailed,
            SnapMediaError::DecryptFailed(_) => ErrorCode::DecryptFailed,
            SnapMediaError::Io(_) => ErrorCode::Io,
            SnapMediaError::Internal(_) => ErrorCode::Internal,
        }
    }
}
