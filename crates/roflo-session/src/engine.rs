//! # Purchase Engine
//!
//! Runs a purchase end to end: local checks, host approval under a timeout,
//! then the synchronous commit from `roflo-core`.
//!
//! ## Purchase Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      attempt_purchase()                                 │
//! │                                                                         │
//! │  1. check_purchase(state, item)                                        │
//! │        AlreadyOwned / InsufficientFunds ──► Err, host never asked      │
//! │                                                                         │
//! │  2. timeout(bridge.submit_purchase({ id, name, price }))   ◄─ await    │
//! │        elapsed            ──► BridgeUnavailable                        │
//! │        Err(bridge error)  ──► BridgeUnavailable                        │
//! │        success: false     ──► BridgeDenied(message)                    │
//! │        success: true      ──► continue                                 │
//! │                                                                         │
//! │  3. state.commit_purchase(item)     no await from here on              │
//! │        re-checks, writes balance + ownership together                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping the future during step 2 leaves the state untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use roflo_core::purchase::check_purchase;
use roflo_core::{AccountState, CatalogItem, CoreError, CoreResult, PurchaseReceipt};

use crate::bridge::HostBridge;

pub struct PurchaseEngine {
    bridge: Arc<dyn HostBridge>,
    timeout: Duration,
}

impl PurchaseEngine {
    pub fn new(bridge: Arc<dyn HostBridge>, timeout: Duration) -> Self {
        PurchaseEngine { bridge, timeout }
    }

    pub fn bridge(&self) -> &Arc<dyn HostBridge> {
        &self.bridge
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempts to buy `item` for the account in `state`.
    ///
    /// On any `Err` the state is exactly as it was before the call.
    pub async fn attempt_purchase(
        &self,
        state: &mut AccountState,
        item: &CatalogItem,
    ) -> CoreResult<PurchaseReceipt> {
        check_purchase(state, item)?;

        let request = item.purchase_request();
        debug!(item_id = %request.id, price = %request.price, "Submitting purchase to host");

        let result = match tokio::time::timeout(self.timeout, self.bridge.submit_purchase(&request))
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(item_id = %item.id, error = %err, "Host bridge failed");
                return Err(CoreError::BridgeUnavailable(err.to_string()));
            }
            Err(_) => {
                warn!(
                    item_id = %item.id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Host bridge timed out"
                );
                return Err(CoreError::BridgeUnavailable(format!(
                    "no response within {} ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if !result.success {
            warn!(item_id = %item.id, message = %result.message, "Host denied purchase");
            return Err(CoreError::BridgeDenied(result.message));
        }

        state.commit_purchase(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::scripted::{Reply, ScriptedBridge};
    use crate::bridge::{BridgeError, NoOpBridge};
    use roflo_core::{Catalog, Coins};

    const TIMEOUT: Duration = Duration::from_millis(5000);

    fn engine(bridge: &Arc<ScriptedBridge>) -> PurchaseEngine {
        PurchaseEngine::new(bridge.clone(), TIMEOUT)
    }

    fn os() -> CatalogItem {
        Catalog::sample().get("1").cloned().unwrap()
    }

    #[tokio::test]
    async fn test_approved_purchase_commits() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut state = AccountState::new("RofloUser", Coins::new(1000));

        let receipt = engine(&bridge)
            .attempt_purchase(&mut state, &os())
            .await
            .unwrap();

        assert_eq!(receipt.balance_after, Coins::new(850));
        assert_eq!(state.balance(), Coins::new(850));
        assert!(state.owns("1"));

        let requests = bridge.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "RofloOS");
        assert_eq!(requests[0].price, Coins::new(150));
    }

    #[tokio::test]
    async fn test_denial_surfaces_host_message() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Deny(
            "card declined".to_string(),
        )));
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        let before = state.clone();

        let err = engine(&bridge)
            .attempt_purchase(&mut state, &os())
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::BridgeDenied("card declined".to_string()));
        assert_eq!(err.user_message(), "card declined");
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_bridge_error_is_unavailable() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Fail(
            BridgeError::Disconnected,
        )));
        let mut state = AccountState::new("RofloUser", Coins::new(1000));

        let err = engine(&bridge)
            .attempt_purchase(&mut state, &os())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::BridgeUnavailable(_)));
        assert_eq!(state.balance(), Coins::new(1000));
        assert!(state.owned().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable_without_mutation() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Hang));
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        let before = state.clone();

        let err = engine(&bridge)
            .attempt_purchase(&mut state, &os())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::BridgeUnavailable("no response within 5000 ms".to_string())
        );
        assert_eq!(state, before);
        assert_eq!(bridge.request_count(), 1);
    }

    #[tokio::test]
    async fn test_local_rejection_skips_host() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let engine = engine(&bridge);

        let mut poor = AccountState::new("RofloUser", Coins::new(100));
        let err = engine.attempt_purchase(&mut poor, &os()).await.unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));

        let mut owner = AccountState::new("RofloUser", Coins::new(1000));
        engine.attempt_purchase(&mut owner, &os()).await.unwrap();
        let err = engine.attempt_purchase(&mut owner, &os()).await.unwrap_err();
        assert!(matches!(err, CoreError::AlreadyOwned { .. }));

        // Only the one successful attempt reached the host.
        assert_eq!(bridge.request_count(), 1);
        assert_eq!(owner.balance(), Coins::new(850));
    }

    #[tokio::test]
    async fn test_noop_bridge_approves() {
        let engine = PurchaseEngine::new(Arc::new(NoOpBridge::new()), TIMEOUT);
        let mut state = AccountState::new("RofloUser", Coins::new(200));

        let chat = Catalog::sample().get("2").cloned().unwrap();
        engine.attempt_purchase(&mut state, &chat).await.unwrap();
        assert_eq!(state.balance(), Coins::new(125));
    }
}
