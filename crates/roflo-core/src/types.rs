//! # Domain Types
//!
//! Core domain types used throughout RofloBank.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    Account      │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  display_name   │   │  id (UUID)      │       │
//! │  │  name, price    │   │  balance        │   │  kind, amount   │       │
//! │  │  category       │   └─────────────────┘   │  status         │       │
//! │  │  developer      │                         └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PurchaseRequest │   │ PurchaseResult  │   │  AccountTier    │       │
//! │  │  (to the host)  │   │ success+message │   │ Beginner..      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::coins::Coins;
use crate::{DEFAULT_DISPLAY_NAME, DEFAULT_STARTING_BALANCE};

// =============================================================================
// Catalog Item
// =============================================================================

/// A project available in the store.
///
/// Immutable once the catalog is loaded; the ownership set refers to items
/// by `id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier within the catalog.
    pub id: String,

    /// Display name shown on the store card.
    pub name: String,

    /// Price in coins.
    pub price: Coins,

    /// Category used by the store filter.
    pub category: String,

    /// Free-text description, searched by the store filter.
    pub description: String,

    /// Studio that published the project.
    pub developer: String,
}

impl CatalogItem {
    /// Builds the request the host bridge receives for this item.
    pub fn purchase_request(&self) -> PurchaseRequest {
        PurchaseRequest {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
        }
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

// =============================================================================
// Account
// =============================================================================

/// The single local user's identity and balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Account {
    pub display_name: String,
    pub balance: Coins,
}

impl Default for Account {
    fn default() -> Self {
        Account {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            balance: Coins::new(DEFAULT_STARTING_BALANCE),
        }
    }
}

/// Partial account supplied by the host at startup.
///
/// Any field present overrides the session default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AccountPatch {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub balance: Option<Coins>,
}

impl AccountPatch {
    /// True when the patch carries no overrides.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.balance.is_none()
    }
}

// =============================================================================
// Account Tier
// =============================================================================

/// Account level shown on the profile, derived from the balance.
///
/// ```text
///   0 ────────── 999 │ 1000 ──────── 4999 │ 5000 ──────────►
///      Beginner      │     Advanced       │     Premium
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AccountTier {
    Beginner,
    Advanced,
    Premium,
}

impl AccountTier {
    /// Lower bound of the Advanced tier.
    pub const ADVANCED_THRESHOLD: Coins = Coins::new(1000);
    /// Lower bound of the Premium tier.
    pub const PREMIUM_THRESHOLD: Coins = Coins::new(5000);

    /// Tier for a given balance.
    pub fn for_balance(balance: Coins) -> Self {
        if balance >= Self::PREMIUM_THRESHOLD {
            AccountTier::Premium
        } else if balance >= Self::ADVANCED_THRESHOLD {
            AccountTier::Advanced
        } else {
            AccountTier::Beginner
        }
    }

    /// Balance needed to reach the next tier, `None` at the top.
    pub fn next_threshold(&self) -> Option<Coins> {
        match self {
            AccountTier::Beginner => Some(Self::ADVANCED_THRESHOLD),
            AccountTier::Advanced => Some(Self::PREMIUM_THRESHOLD),
            AccountTier::Premium => None,
        }
    }
}

impl std::fmt::Display for AccountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountTier::Beginner => write!(f, "Beginner"),
            AccountTier::Advanced => write!(f, "Advanced"),
            AccountTier::Premium => write!(f, "Premium"),
        }
    }
}

// =============================================================================
// Purchase Messages
// =============================================================================

/// What the host bridge is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseRequest {
    pub id: String,
    pub name: String,
    pub price: Coins,
}

/// Outcome of a purchase attempt as the UI (and the host) see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseResult {
    pub success: bool,
    pub message: String,
}

impl PurchaseResult {
    /// An approving result.
    pub fn approved(message: impl Into<String>) -> Self {
        PurchaseResult {
            success: true,
            message: message.into(),
        }
    }

    /// A refusing result.
    pub fn denied(message: impl Into<String>) -> Self {
        PurchaseResult {
            success: false,
            message: message.into(),
        }
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionKind {
    Deposit,
    Purchase,
    Refund,
}

impl std::str::FromStr for TransactionKind {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "purchase" => Ok(TransactionKind::Purchase),
            "refund" => Ok(TransactionKind::Refund),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "transaction kind".to_string(),
                allowed: vec![
                    "deposit".to_string(),
                    "purchase".to_string(),
                    "refund".to_string(),
                ],
            }),
        }
    }
}

/// Settlement state of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

/// A line in the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Signed balance delta: deposits positive, purchases negative.
    pub amount: i64,
    pub description: String,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
    pub status: TransactionStatus,
}

// =============================================================================
// Views and Inbound Events
// =============================================================================

/// The four storefront screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum View {
    #[default]
    Dashboard,
    Store,
    History,
    Profile,
}

impl std::str::FromStr for View {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "home" => Ok(View::Dashboard),
            "store" | "catalog" => Ok(View::Store),
            "history" | "transactions" => Ok(View::History),
            "profile" => Ok(View::Profile),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "view".to_string(),
                allowed: vec![
                    "dashboard".to_string(),
                    "store".to_string(),
                    "history".to_string(),
                    "profile".to_string(),
                ],
            }),
        }
    }
}

/// Events the shell posts into the session.
///
/// Independent of any windowing or IPC technology: the host bridge's
/// signals are translated into these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "view", rename_all = "snake_case")]
#[ts(export)]
pub enum ShellEvent {
    /// Switch the current view.
    Navigate(View),
    /// Show the about text.
    ShowAbout,
}

// =============================================================================
// Unit Tests
// =============================================================================
