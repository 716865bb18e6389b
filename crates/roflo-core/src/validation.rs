//! # Validation Module
//!
//! Input validation for the storefront transitions.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (console / UI)                                         │
//! │  └── Parsing text into numbers and ids                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Range and format rules, before any state is touched               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: AccountState transitions                                     │
//! │  └── Balance / ownership invariants                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::coins::Coins;
use crate::error::{CoreError, ValidationError};
use crate::{MAX_DEPOSIT, MAX_DISPLAY_NAME_LEN, MIN_DEPOSIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a store search query.
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// Amounts
// =============================================================================

/// Validates a deposit amount.
///
/// ## Rules
/// - Must be at least [`MIN_DEPOSIT`] (1)
/// - Must not exceed [`MAX_DEPOSIT`] (10000)
///
/// ## Example
/// ```rust
/// use roflo_core::validation::validate_deposit_amount;
///
/// assert!(validate_deposit_amount(500).is_ok());
/// assert!(validate_deposit_amount(0).is_err());
/// assert!(validate_deposit_amount(10_001).is_err());
/// ```
pub fn validate_deposit_amount(amount: u64) -> Result<Coins, CoreError> {
    if !(MIN_DEPOSIT..=MAX_DEPOSIT).contains(&amount) {
        return Err(CoreError::InvalidAmount {
            amount,
            min: MIN_DEPOSIT,
            max: MAX_DEPOSIT,
        });
    }

    Ok(Coins::new(amount))
}

/// Parses a deposit amount typed by the user.
///
/// Anything that is not a whole number in range is `InvalidAmount`; a
/// negative entry reports amount 0.
pub fn parse_deposit_amount(input: &str) -> Result<Coins, CoreError> {
    let trimmed = input.trim();
    let amount = match trimmed.parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            return Err(CoreError::InvalidAmount {
                amount: 0,
                min: MIN_DEPOSIT,
                max: MAX_DEPOSIT,
            })
        }
    };
    validate_deposit_amount(amount)
}

// =============================================================================
// Strings
// =============================================================================

/// Validates and normalizes a display name.
///
/// ## Rules
/// - Trimmed before checking
/// - Must not be empty
/// - At most [`MAX_DISPLAY_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_display_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "display name".to_string(),
        });
    }

    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "display name".to_string(),
            max: MAX_DISPLAY_NAME_LEN,
        });
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "display name".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Validates a store search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
