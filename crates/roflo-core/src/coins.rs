//! # Coins Module
//!
//! Provides the `Coins` type for the in-app currency balance.
//!
//! ## Why an Unsigned Newtype?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE NEGATIVE BALANCE PROBLEM                                           │
//! │                                                                         │
//! │  With a plain signed number:                                            │
//! │    balance = 100; balance -= 150;  →  -50   ❌ overdrawn account        │
//! │                                                                         │
//! │  OUR SOLUTION: u64 + checked arithmetic                                 │
//! │    Coins(100).checked_sub(Coins(150))  →  None                          │
//! │    The caller MUST handle the shortfall before touching the balance     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no `Sub` impl: every subtraction goes through
//! [`Coins::checked_sub`].
//!
//! ## Usage
//! ```rust
//! use roflo_core::coins::Coins;
//!
//! let balance = Coins::new(1000);
//! let price = Coins::new(150);
//!
//! assert_eq!(balance.checked_sub(price), Some(Coins::new(850)));
//! assert_eq!(price.checked_sub(balance), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Coins Type
// =============================================================================

/// An amount of the abstract in-app currency.
///
/// ## Design Decisions
/// - **u64 (unsigned)**: a balance can never be represented as negative
/// - **Single field tuple struct**: zero-cost abstraction over u64
/// - **Newtype serde**: serializes as a bare number for the UI
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Coins(u64);

impl Coins {
    /// Creates an amount from a whole number of coins.
    #[inline]
    pub const fn new(amount: u64) -> Self {
        Coins(amount)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Zero coins.
    #[inline]
    pub const fn zero() -> Self {
        Coins(0)
    }

    /// Adds two amounts, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use roflo_core::coins::Coins;
    ///
    /// assert_eq!(Coins::new(850).checked_add(Coins::new(150)), Some(Coins::new(1000)));
    /// assert_eq!(Coins::new(u64::MAX).checked_add(Coins::new(1)), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Coins) -> Option<Coins> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Coins(v)),
            None => None,
        }
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    ///
    /// ## User Workflow
    /// ```text
    /// Balance: 100     Price: 150
    ///      │
    ///      ▼
    /// checked_sub(150) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// None → InsufficientFunds, balance stays 100
    /// ```
    #[inline]
    pub const fn checked_sub(self, other: Coins) -> Option<Coins> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Coins(v)),
            None => None,
        }
    }

    /// Returns the amount as a signed ledger delta (for transaction history).
    ///
    /// Amounts above `i64::MAX` saturate.
    pub fn as_delta(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the currency code, for logs and messages.
impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} RC", self.0)
    }
}

impl From<u64> for Coins {
    fn from(amount: u64) -> Self {
        Coins(amount)
    }
}

/// Saturating addition, used for aggregates such as "total spent".
///
/// Balance transitions use [`Coins::checked_add`] instead.
impl Add for Coins {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Coins(self.0.saturating_add(other.0))
    }
}

impl Sum for Coins {
    fn sum<I: Iterator<Item = Coins>>(iter: I) -> Self {
        iter.fold(Coins::zero(), |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Coins> for Coins {
    fn sum<I: Iterator<Item = &'a Coins>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
