//! Error handling for Newsletter Studio
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for Newsletter Studio
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Backend error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i64 },

    #[error("Newsletter not found: {newsletter_id}")]
    NewsletterNotFound { newsletter_id: i64 },

    #[error("Contribution not found: {contribution_id}")]
    ContributionNotFound { contribution_id: i64 },

    #[error("Layout block not found: {block_id}")]
    LayoutBlockNotFound { block_id: String },

    #[error("{0} must be confirmed by the backend")]
    BackendRequired(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation already in progress: {0}")]
    Busy(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Backend gateway specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Backend timeout")]
    Timeout,

    #[error("Backend unavailable")]
    Unavailable,

    #[error("HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Session expired: {0}")]
    Unauthorized(String),

    #[error("Unexpected payload from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Not signed in")]
    MissingToken,
}

/// Result type alias for Newsletter Studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Result type alias for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl StudioError {
    /// Check if the error is recoverable by retrying the action
    pub fn is_recoverable(&self) -> bool {
        match self {
            StudioError::Config(_) => false,
            StudioError::ConfigLoad(_) => false,
            StudioError::Gateway(e) => !matches!(
                e,
                GatewayError::Unauthorized(_) | GatewayError::MissingToken | GatewayError::Decode { .. }
            ),
            StudioError::PermissionDenied(_) => false,
            StudioError::UserNotFound { .. } => false,
            StudioError::GroupNotFound { .. } => false,
            StudioError::NewsletterNotFound { .. } => false,
            StudioError::ContributionNotFound { .. } => false,
            StudioError::LayoutBlockNotFound { .. } => false,
            StudioError::BackendRequired(_) => false,
            StudioError::InvalidStateTransition { .. } => false,
            StudioError::InvalidInput(_) => true,
            StudioError::Busy(_) => true,
            StudioError::Serialization(_) => false,
            StudioError::Io(_) => true,
            StudioError::UrlParse(_) => false,
        }
    }

    /// Whether the session was lost and the user must sign in again
    pub fn is_session_lost(&self) -> bool {
        matches!(
            self,
            StudioError::Gateway(GatewayError::Unauthorized(_)) | StudioError::Gateway(GatewayError::MissingToken)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StudioError::Config(_) => ErrorSeverity::Critical,
            StudioError::ConfigLoad(_) => ErrorSeverity::Critical,
            StudioError::PermissionDenied(_) => ErrorSeverity::Warning,
            StudioError::BackendRequired(_) => ErrorSeverity::Warning,
            StudioError::Gateway(GatewayError::Unauthorized(_)) => ErrorSeverity::Warning,
            StudioError::Gateway(GatewayError::MissingToken) => ErrorSeverity::Warning,
            StudioError::Busy(_) => ErrorSeverity::Info,
            StudioError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
