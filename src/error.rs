//! Unified error handling for warden.
//!
//! This module provides the error hierarchy for command handling and
//! allow-list persistence, with metric labels for each failure kind.

use crate::platform::PlatformError;
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can escape a command handler.
///
/// Anything returned here is caught by the dispatcher's failure boundary and
/// turned into the generic failure reply; the detail only reaches the logs.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing option: {0}")]
    MissingOption(&'static str),

    #[error("a reply was already sent for this invocation")]
    AlreadyReplied,

    #[error("allow-list persistence failed: {0}")]
    Store(#[from] StoreError),

    #[error("platform call failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("failed to deliver reply: {0}")]
    Send(PlatformError),

    #[error("no handler registered for {command} {subcommand:?}")]
    NoHandler {
        command: String,
        subcommand: Option<String>,
    },
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingOption(_) => "missing_option",
            Self::AlreadyReplied => "already_replied",
            Self::Store(_) => "store_error",
            Self::Platform(_) => "platform_error",
            Self::Send(_) => "send_error",
            Self::NoHandler { .. } => "no_handler",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Store Errors (allow-list persistence)
// ============================================================================

/// Allow-list persistence errors.
///
/// A failed write is fatal for the mutation that caused it: the store rolls
/// the in-memory change back before returning one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("allow-list file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("allow-list file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::MissingOption("user").error_code(), "missing_option");
        assert_eq!(HandlerError::AlreadyReplied.error_code(), "already_replied");
        assert_eq!(
            HandlerError::NoHandler {
                command: "ping".into(),
                subcommand: None
            }
            .error_code(),
            "no_handler"
        );
        assert_eq!(
            HandlerError::Platform(PlatformError::NotFound).error_code(),
            "platform_error"
        );
    }

    #[test]
    fn test_store_error_converts_into_handler_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: HandlerError = StoreError::from(io).into();
        assert_eq!(err.error_code(), "store_error");
        assert!(err.to_string().contains("read-only"));
    }
}
