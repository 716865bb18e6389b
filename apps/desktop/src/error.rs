//! # API Error Type
//!
//! Unified error type for shell commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RofloBank                              │
//! │                                                                         │
//! │  Console                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  > buy 1                                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  execute()                                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Session::purchase ── CoreError::InsufficientFunds ── ApiError ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "error": { "code": "INSUFFICIENT_FUNDS",                             │
//! │               "message": "Insufficient RofloCoins: need 150 RC, ..." } }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use roflo_core::CoreError;
use roflo_session::SessionError;

/// Error returned from a shell command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ALREADY_OWNED",
///   "message": "You already own RofloOS"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ItemNotFound,
    AlreadyOwned,
    InsufficientFunds,
    InvalidAmount,
    BridgeDenied,
    BridgeUnavailable,
    ValidationError,
    ConfigError,
    /// Input line did not parse as a command
    UnknownCommand,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_command(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::UnknownCommand, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl ErrorCode {
    /// Maps a stable domain code (`CoreError::code`, `SessionError::code`).
    ///
    /// Unrecognized codes become [`ErrorCode::Internal`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "ITEM_NOT_FOUND" => ErrorCode::ItemNotFound,
            "ALREADY_OWNED" => ErrorCode::AlreadyOwned,
            "INSUFFICIENT_FUNDS" => ErrorCode::InsufficientFunds,
            "INVALID_AMOUNT" => ErrorCode::InvalidAmount,
            "BRIDGE_DENIED" => ErrorCode::BridgeDenied,
            "BRIDGE_UNAVAILABLE" => ErrorCode::BridgeUnavailable,
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "CONFIG_ERROR" => ErrorCode::ConfigError,
            "UNKNOWN_COMMAND" => ErrorCode::UnknownCommand,
            _ => ErrorCode::Internal,
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::new(ErrorCode::from_code(err.code()), err.user_message())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let code = ErrorCode::from_code(err.code());
        match err {
            SessionError::Core(core) => ApiError::new(code, core.user_message()),
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        ApiError::internal("Failed to serialize response")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
