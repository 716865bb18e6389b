//! # Account State
//!
//! The user record plus the set of owned projects.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Account State Transitions                            │
//! │                                                                         │
//! │  Action                 Method                 State Change             │
//! │  ──────                 ──────                 ────────────             │
//! │                                                                         │
//! │  Host data at start ──► apply_patch() ──────► name / balance override  │
//! │                                                                         │
//! │  Deposit ─────────────► deposit() ──────────► balance += amount        │
//! │                                                                         │
//! │  Edit profile ────────► rename() ───────────► display_name = name      │
//! │                                                                         │
//! │  Buy project ─────────► commit_purchase() ──► balance -= price         │
//! │                          (purchase.rs)         owned ∪= {id}           │
//! │                                                                         │
//! │  Every transition validates first and mutates last: an Err return      │
//! │  means nothing changed.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coins::Coins;
use crate::error::{CoreError, CoreResult};
use crate::types::{Account, AccountPatch, AccountTier};
use crate::validation::{validate_deposit_amount, validate_display_name};

// =============================================================================
// Ownership Set
// =============================================================================

/// Ids of purchased catalog items.
///
/// ## Invariants
/// - Each id appears at most once
/// - Ids are kept in purchase order (oldest first)
/// - Only [`AccountState::commit_purchase`] inserts, so every id came from a
///   catalog item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipSet {
    ids: Vec<String>,
}

impl OwnershipSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|owned| owned == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in purchase order, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Inserts an id; returns false if it was already present.
    pub(crate) fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }
}

// =============================================================================
// Account State
// =============================================================================

/// Account plus ownership, mutated only through the transition methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    pub(crate) account: Account,
    pub(crate) owned: OwnershipSet,
}

impl AccountState {
    /// Creates a fresh account with nothing owned.
    pub fn new(display_name: impl Into<String>, balance: Coins) -> Self {
        AccountState {
            account: Account {
                display_name: display_name.into(),
                balance,
            },
            owned: OwnershipSet::default(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn balance(&self) -> Coins {
        self.account.balance
    }

    pub fn display_name(&self) -> &str {
        &self.account.display_name
    }

    pub fn owned(&self) -> &OwnershipSet {
        &self.owned
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.owned.contains(item_id)
    }

    /// Current account tier.
    pub fn tier(&self) -> AccountTier {
        AccountTier::for_balance(self.account.balance)
    }

    /// Applies host-supplied overrides.
    ///
    /// The display name is validated before anything is written, so an
    /// invalid name leaves both fields untouched.
    pub fn apply_patch(&mut self, patch: &AccountPatch) -> CoreResult<()> {
        let name = match &patch.display_name {
            Some(name) => Some(validate_display_name(name)?),
            None => None,
        };

        if let Some(name) = name {
            self.account.display_name = name;
        }
        if let Some(balance) = patch.balance {
            self.account.balance = balance;
        }

        debug!(
            display_name = %self.account.display_name,
            balance = %self.account.balance,
            "Applied account patch"
        );
        Ok(())
    }

    /// Adds `amount` to the balance.
    ///
    /// ## Rules
    /// - `1 <= amount <= 10000`, otherwise `InvalidAmount`
    /// - The balance grows by exactly `amount`
    ///
    /// ## Returns
    /// The new balance.
    ///
    /// ## Example
    /// ```rust
    /// use roflo_core::{AccountState, Coins, CoreError};
    ///
    /// let mut state = AccountState::new("RofloUser", Coins::new(1000));
    /// assert_eq!(state.deposit(500).unwrap(), Coins::new(1500));
    ///
    /// let err = state.deposit(10_001).unwrap_err();
    /// assert!(matches!(err, CoreError::InvalidAmount { .. }));
    /// assert_eq!(state.balance(), Coins::new(1500));
    /// ```
    pub fn deposit(&mut self, amount: u64) -> CoreResult<Coins> {
        let amount = validate_deposit_amount(amount)?;
        let new_balance =
            self.account
                .balance
                .checked_add(amount)
                .ok_or(CoreError::InvalidAmount {
                    amount: amount.amount(),
                    min: crate::MIN_DEPOSIT,
                    max: crate::MAX_DEPOSIT,
                })?;

        self.account.balance = new_balance;
        debug!(amount = %amount, balance = %new_balance, "Deposit applied");
        Ok(new_balance)
    }

    /// Changes the display name (profile edit).
    pub fn rename(&mut self, display_name: &str) -> CoreResult<()> {
        let name = validate_display_name(display_name)?;
        debug!(from = %self.account.display_name, to = %name, "Display name changed");
        self.account.display_name = name;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
