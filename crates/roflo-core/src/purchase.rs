//! # Purchase Transition
//!
//! The local half of a purchase: preconditions and the atomic commit. The
//! host bridge round-trip lives in `roflo-session`; by the time it calls
//! [`AccountState::commit_purchase`] the host has already approved.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Purchase Flow                                    │
//! │                                                                         │
//! │  check_purchase(state, item)                                           │
//! │       │                                                                 │
//! │       ├── id in ownership set?  → AlreadyOwned                          │
//! │       │                                                                 │
//! │       ├── balance < price?      → InsufficientFunds                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [session: host bridge approval, may deny or time out]                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commit_purchase(item)                                                  │
//! │       ├── re-check both preconditions                                   │
//! │       ├── compute new balance (checked)                                 │
//! │       └── write balance AND insert id ── no early return in between     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::account::AccountState;
use crate::coins::Coins;
use crate::error::{CoreError, CoreResult};
use crate::types::{CatalogItem, PurchaseResult};

/// Record of a committed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseReceipt {
    pub item_id: String,
    pub item_name: String,
    pub price: Coins,
    pub balance_before: Coins,
    pub balance_after: Coins,
}

impl PurchaseReceipt {
    /// Message shown to the user after a successful purchase.
    pub fn message(&self) -> String {
        format!("Successfully purchased {}!", self.item_name)
    }
}

impl From<&PurchaseReceipt> for PurchaseResult {
    fn from(receipt: &PurchaseReceipt) -> Self {
        PurchaseResult::approved(receipt.message())
    }
}

/// Flattens an engine outcome into the `{ success, message }` shape.
pub fn to_purchase_result(outcome: &CoreResult<PurchaseReceipt>) -> PurchaseResult {
    match outcome {
        Ok(receipt) => PurchaseResult::from(receipt),
        Err(err) => PurchaseResult::denied(err.user_message()),
    }
}

/// Checks the purchase preconditions without touching the state.
///
/// ## Order
/// 1. Already owned → `AlreadyOwned`
/// 2. Balance below price → `InsufficientFunds`
///
/// ## Returns
/// The balance the account would have after the purchase.
pub fn check_purchase(state: &AccountState, item: &CatalogItem) -> CoreResult<Coins> {
    if state.owns(&item.id) {
        return Err(CoreError::AlreadyOwned {
            item_id: item.id.clone(),
            name: item.name.clone(),
        });
    }

    state
        .balance()
        .checked_sub(item.price)
        .ok_or(CoreError::InsufficientFunds {
            required: item.price,
            available: state.balance(),
        })
}

impl AccountState {
    /// Commits a purchase: decrements the balance and records ownership.
    ///
    /// Both writes happen after every check has passed, with nothing that can
    /// fail between them, so observers see either the old state or the new
    /// one.
    ///
    /// ## Example
    /// ```rust
    /// use roflo_core::{AccountState, Catalog, Coins, CoreError};
    ///
    /// let catalog = Catalog::sample();
    /// let os = catalog.get("1").unwrap(); // 150 RC
    ///
    /// let mut poor = AccountState::new("RofloUser", Coins::new(100));
    /// assert!(matches!(
    ///     poor.commit_purchase(os),
    ///     Err(CoreError::InsufficientFunds { .. })
    /// ));
    /// assert_eq!(poor.balance(), Coins::new(100));
    /// ```
    pub fn commit_purchase(&mut self, item: &CatalogItem) -> CoreResult<PurchaseReceipt> {
        let balance_before = self.balance();
        let balance_after = check_purchase(self, item)?;

        self.account.balance = balance_after;
        self.owned.insert(&item.id);

        info!(
            item_id = %item.id,
            price = %item.price,
            balance = %balance_after,
            "Purchase committed"
        );

        Ok(PurchaseReceipt {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            price: item.price,
            balance_before,
            balance_after,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn os() -> CatalogItem {
        Catalog::sample().get("1").cloned().unwrap()
    }

    #[test]
    fn test_purchase_success_scenario() {
        // balance=1000, price=150, not owned → 850 and {id}
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        let receipt = state.commit_purchase(&os()).unwrap();

        assert_eq!(state.balance(), Coins::new(850));
        assert_eq!(state.owned().iter().collect::<Vec<_>>(), vec!["1"]);
        assert_eq!(receipt.balance_before, Coins::new(1000));
        assert_eq!(receipt.balance_after, Coins::new(850));
        assert_eq!(receipt.message(), "Successfully purchased RofloOS!");
    }

    #[test]
    fn test_insufficient_funds_scenario() {
        // balance=100, price=150 → InsufficientFunds, balance stays 100
        let mut state = AccountState::new("RofloUser", Coins::new(100));
        let before = state.clone();

        let err = state.commit_purchase(&os()).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientFunds {
                required: Coins::new(150),
                available: Coins::new(100),
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_exact_balance_is_affordable() {
        let mut state = AccountState::new("RofloUser", Coins::new(150));
        state.commit_purchase(&os()).unwrap();
        assert_eq!(state.balance(), Coins::zero());
    }

    #[test]
    fn test_repurchase_is_already_owned() {
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        state.commit_purchase(&os()).unwrap();
        let after_first = state.clone();

        let err = state.commit_purchase(&os()).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyOwned { ref item_id, .. } if item_id == "1"));
        assert_eq!(state, after_first);
    }

    #[test]
    fn test_already_owned_checked_before_funds() {
        let mut state = AccountState::new("RofloUser", Coins::new(150));
        state.commit_purchase(&os()).unwrap();

        // Balance is now 0, but the ownership check comes first.
        assert!(matches!(
            check_purchase(&state, &os()),
            Err(CoreError::AlreadyOwned { .. })
        ));
    }

    #[test]
    fn test_every_item_conserves_balance() {
        let catalog = Catalog::sample();
        for start in [0u64, 74, 75, 100, 150, 199, 200, 1000] {
            for item in catalog.items() {
                let mut state = AccountState::new("RofloUser", Coins::new(start));
                let result = state.commit_purchase(item);

                if start >= item.price.amount() {
                    assert!(result.is_ok());
                    assert_eq!(state.balance().amount(), start - item.price.amount());
                    assert!(state.owns(&item.id));
                } else {
                    assert!(matches!(result, Err(CoreError::InsufficientFunds { .. })));
                    assert_eq!(state.balance().amount(), start);
                    assert!(state.owned().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_to_purchase_result() {
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        let ok = state.commit_purchase(&os());
        assert_eq!(
            to_purchase_result(&ok),
            PurchaseResult::approved("Successfully purchased RofloOS!")
        );

        let denied: CoreResult<PurchaseReceipt> =
            Err(CoreError::BridgeDenied("card declined".to_string()));
        assert_eq!(to_purchase_result(&denied), PurchaseResult::denied("card declined"));
    }
}
