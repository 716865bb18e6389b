//! # Error Types
//!
//! Domain-specific error types for roflo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  roflo-core errors (this file)                                         │
//! │  ├── CoreError        - Purchase/deposit/bridge outcomes               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  roflo-session errors (separate crate)                                 │
//! │  └── SessionError     - Config loading failures                        │
//! │                                                                         │
//! │  Desktop shell errors (in app)                                         │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable. None of them leaves a partially applied
//! transition behind: the state a failing call was given is the state it
//! returns.

use thiserror::Error;

use crate::coins::Coins;

// =============================================================================
// Core Error
// =============================================================================

/// Failures of the storefront transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested item id is not in the catalog.
    #[error("Project not found: {0}")]
    ItemNotFound(String),

    /// The item is already in the ownership set.
    ///
    /// ## When This Occurs
    /// - Clicking "buy" on a project that was bought earlier this session
    /// - The host replaying a purchase signal
    #[error("You already own {name}")]
    AlreadyOwned { item_id: String, name: String },

    /// The balance does not cover the price.
    ///
    /// ## User Workflow
    /// ```text
    /// Buy RofloOS (150 RC)
    ///      │
    ///      ▼
    /// Check balance: 100 RC
    ///      │
    ///      ▼
    /// InsufficientFunds { required: 150, available: 100 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient RofloCoins: need 150 RC, have 100 RC"
    /// ```
    #[error("Insufficient RofloCoins: need {required}, have {available}")]
    InsufficientFunds { required: Coins, available: Coins },

    /// Deposit amount outside the accepted range.
    #[error("Invalid amount {amount}: enter a value between {min} and {max} RC")]
    InvalidAmount { amount: u64, min: u64, max: u64 },

    /// The host bridge explicitly refused the purchase.
    #[error("Purchase failed: {0}")]
    BridgeDenied(String),

    /// The host bridge could not be reached, errored, or timed out.
    #[error("Purchase service unavailable: {0}")]
    BridgeUnavailable(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            CoreError::AlreadyOwned { .. } => "ALREADY_OWNED",
            CoreError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            CoreError::InvalidAmount { .. } => "INVALID_AMOUNT",
            CoreError::BridgeDenied(_) => "BRIDGE_DENIED",
            CoreError::BridgeUnavailable(_) => "BRIDGE_UNAVAILABLE",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Message to show the user.
    ///
    /// For a host denial this is the host's own message, unchanged.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::BridgeDenied(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
