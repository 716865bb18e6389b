//! # roflo-core: Pure Business Logic for RofloBank
//!
//! This crate is the **heart** of RofloBank. It holds the account state, the
//! purchase transition and the read-only view projections as plain functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RofloBank Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Shell                             │   │
//! │  │    Dashboard ──► Store ──► History ──► Profile                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ShellEvent / commands                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 roflo-session (Session, PurchaseEngine)         │   │
//! │  │           host bridge round-trip, timeout, config               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ roflo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  account  │  │ purchase  │  │   view    │  │   │
//! │  │   │  Catalog  │  │ Account-  │  │ check +   │  │ select_   │  │   │
//! │  │   │  items    │  │ State     │  │ commit    │  │ view      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coins`] - `Coins` balance type with checked arithmetic
//! - [`types`] - Domain types (CatalogItem, Account, Transaction, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`catalog`] - The fixed project catalog
//! - [`account`] - Account state: balance, ownership, deposit, rename
//! - [`purchase`] - Purchase preconditions and the atomic commit
//! - [`history`] - Transaction history and its totals
//! - [`view`] - The view router and its view models
//!
//! ## Example Usage
//!
//! ```rust
//! use roflo_core::{AccountState, Catalog, Coins};
//!
//! let catalog = Catalog::sample();
//! let mut state = AccountState::new("RofloUser", Coins::new(1000));
//!
//! let item = catalog.get("1").unwrap(); // RofloOS, 150 coins
//! state.commit_purchase(item).unwrap();
//!
//! assert_eq!(state.balance(), Coins::new(850));
//! assert!(state.owns("1"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod catalog;
pub mod coins;
pub mod error;
pub mod history;
pub mod purchase;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use account::{AccountState, OwnershipSet};
pub use catalog::Catalog;
pub use coins::Coins;
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::TransactionHistory;
pub use purchase::PurchaseReceipt;
pub use types::*;
pub use view::{select_view, ViewModel};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Display name of a fresh account.
pub const DEFAULT_DISPLAY_NAME: &str = "RofloUser";

/// Balance every session starts with unless the host says otherwise.
pub const DEFAULT_STARTING_BALANCE: u64 = 1000;

/// Smallest accepted deposit.
pub const MIN_DEPOSIT: u64 = 1;

/// Largest accepted deposit.
///
/// ## Business Reason
/// Keeps a mistyped amount (100000 instead of 10000) from inflating the
/// balance in one step.
pub const MAX_DEPOSIT: u64 = 10_000;

/// Maximum length of a display name, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Number of recent purchases listed on the dashboard.
pub const RECENT_PURCHASES_LIMIT: usize = 3;

/// Text shown for the "about" shell signal.
pub const ABOUT_TEXT: &str = "RofloBank v1.0.0\nVirtual Currency Platform for Project Purchases";
