//! # Session
//!
//! One running storefront: account state, catalog, history, the current
//! screen and the host bridge. Nothing here is global; the shell owns the
//! session and passes it around.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  Session::start(config, bridge)                                        │
//! │     ├── state from config (name, starting balance)                     │
//! │     ├── bridge.subscribe()   (before any await: no signal is missed)   │
//! │     ├── bridge.initial_account() under timeout → apply_patch           │
//! │     │      (failure: keep config values, log a warning)                │
//! │     └── seed transaction history                                       │
//! │                                                                         │
//! │  user actions ──► purchase() / deposit() / rename() / navigate() ...   │
//! │  host signals ──► pump_signals() ──► handle_event()                    │
//! │  rendering    ──► view()                                               │
//! │                                                                         │
//! │  shutdown() / drop ──► bridge.unsubscribe()                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use roflo_core::validation::validate_search_query;
use roflo_core::view::ViewState;
use roflo_core::{
    select_view, AccountState, Catalog, Coins, CoreResult, PurchaseReceipt, ShellEvent,
    TransactionHistory, TransactionKind, ValidationError, View, ViewModel, ABOUT_TEXT,
};

use crate::bridge::{HostBridge, Subscription};
use crate::config::SessionConfig;
use crate::engine::PurchaseEngine;

pub struct Session {
    state: AccountState,
    catalog: Catalog,
    history: TransactionHistory,
    current: ViewState,
    engine: PurchaseEngine,
    subscription: Option<Subscription>,
}

impl Session {
    /// Starts a session over the built-in catalog.
    pub async fn start(config: &SessionConfig, bridge: Arc<dyn HostBridge>) -> Self {
        Self::start_with_catalog(config, Catalog::sample(), bridge).await
    }

    pub async fn start_with_catalog(
        config: &SessionConfig,
        catalog: Catalog,
        bridge: Arc<dyn HostBridge>,
    ) -> Self {
        let mut state = config.initial_state();
        let timeout = config.bridge_timeout();
        let subscription = bridge.subscribe();

        match tokio::time::timeout(timeout, bridge.initial_account()).await {
            Ok(Ok(patch)) if !patch.is_empty() => {
                if let Err(e) = state.apply_patch(&patch) {
                    warn!(error = %e, "Ignoring invalid initial account data from host");
                }
            }
            Ok(Ok(_)) => debug!("Host supplied no initial account data"),
            Ok(Err(e)) => warn!(error = %e, "Could not fetch initial account data"),
            Err(_) => warn!(
                timeout_ms = config.bridge.timeout_ms,
                "Timed out fetching initial account data"
            ),
        }

        info!(
            display_name = %state.display_name(),
            balance = %state.balance(),
            items = catalog.len(),
            "Session started"
        );

        Session {
            state,
            catalog,
            history: TransactionHistory::seeded(Utc::now()),
            current: ViewState::default(),
            engine: PurchaseEngine::new(bridge, timeout),
            subscription: Some(subscription),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn current_view(&self) -> View {
        self.current.view
    }

    pub fn view_state(&self) -> &ViewState {
        &self.current
    }

    /// Model of the current screen.
    pub fn view(&self) -> ViewModel {
        select_view(&self.current, &self.state, &self.catalog, &self.history)
    }

    // =========================================================================
    // Navigation & Filters
    // =========================================================================

    pub fn navigate(&mut self, view: View) {
        debug!(from = ?self.current.view, to = ?view, "Navigate");
        self.current.view = view;
    }

    /// Sets the store search text.
    pub fn set_search(&mut self, query: &str) -> CoreResult<()> {
        self.current.store.search = validate_search_query(query)?;
        Ok(())
    }

    /// Sets the store category; `None` shows all categories.
    pub fn set_category(&mut self, category: Option<&str>) -> CoreResult<()> {
        let category = match category {
            None => None,
            Some(name) => {
                let categories = self.catalog.categories();
                if !categories.iter().any(|c| c == name) {
                    return Err(ValidationError::NotAllowed {
                        field: "category".to_string(),
                        allowed: categories,
                    }
                    .into());
                }
                Some(name.to_string())
            }
        };
        self.current.store.category = category;
        Ok(())
    }

    pub fn set_history_filter(&mut self, kind: Option<TransactionKind>) {
        self.current.history_kind = kind;
    }

    // =========================================================================
    // Account Actions
    // =========================================================================

    /// Buys the catalog item with `item_id`.
    ///
    /// Successful purchases are appended to the transaction history.
    pub async fn purchase(&mut self, item_id: &str) -> CoreResult<PurchaseReceipt> {
        let item = self.catalog.require(item_id)?;
        let receipt = self.engine.attempt_purchase(&mut self.state, item).await?;
        self.history.record_purchase(&receipt, Utc::now());
        Ok(receipt)
    }

    pub fn deposit(&mut self, amount: u64) -> CoreResult<Coins> {
        let balance = self.state.deposit(amount)?;
        self.history.record_deposit(Coins::new(amount), Utc::now());
        Ok(balance)
    }

    pub fn rename(&mut self, display_name: &str) -> CoreResult<()> {
        self.state.rename(display_name)
    }

    // =========================================================================
    // Inbound Events
    // =========================================================================

    /// Applies a shell event; returns text to show the user, if any.
    pub fn handle_event(&mut self, event: ShellEvent) -> Option<String> {
        match event {
            ShellEvent::Navigate(view) => {
                self.navigate(view);
                None
            }
            ShellEvent::ShowAbout => Some(ABOUT_TEXT.to_string()),
        }
    }

    /// Handles every queued host signal; returns the resulting notices.
    pub fn pump_signals(&mut self) -> Vec<String> {
        let mut signals = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(signal) = subscription.try_next() {
                signals.push(signal);
            }
        }

        signals
            .into_iter()
            .filter_map(|signal| {
                debug!(%signal, "Handling host signal");
                self.handle_event(signal.to_event())
            })
            .collect()
    }

    /// Removes the signal listener. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.engine.bridge().unsubscribe(subscription);
            info!("Session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::scripted::{Reply, ScriptedBridge};
    use crate::bridge::{BridgeError, ShellSignal};
    use roflo_core::{AccountPatch, CoreError};
    use std::time::Duration;

    async fn session_with(bridge: &Arc<ScriptedBridge>) -> Session {
        Session::start(&SessionConfig::default(), bridge.clone()).await
    }

    #[tokio::test]
    async fn test_start_applies_host_data() {
        let mut bridge = ScriptedBridge::replying(Reply::Approve);
        bridge.initial = Ok(AccountPatch {
            display_name: Some("Neo".to_string()),
            balance: Some(Coins::new(4200)),
        });
        let bridge = Arc::new(bridge);

        let session = session_with(&bridge).await;
        assert_eq!(session.state().display_name(), "Neo");
        assert_eq!(session.state().balance(), Coins::new(4200));
        assert_eq!(session.current_view(), View::Dashboard);
        assert_eq!(session.history().len(), 3);
    }

    #[tokio::test]
    async fn test_start_keeps_defaults_when_host_fails() {
        let mut bridge = ScriptedBridge::replying(Reply::Approve);
        bridge.initial = Err(BridgeError::Disconnected);
        let bridge = Arc::new(bridge);

        let session = session_with(&bridge).await;
        assert_eq!(session.state().display_name(), "RofloUser");
        assert_eq!(session.state().balance(), Coins::new(1000));
    }

    #[tokio::test]
    async fn test_purchase_records_history() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut session = session_with(&bridge).await;

        let receipt = session.purchase("2").await.unwrap();
        assert_eq!(receipt.message(), "Successfully purchased RofloChat!");
        assert_eq!(session.state().balance(), Coins::new(925));
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history().entries()[0].amount, -75);
    }

    #[tokio::test]
    async fn test_failed_purchase_changes_nothing() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Deny(
            "card declined".to_string(),
        )));
        let mut session = session_with(&bridge).await;
        let before = session.state().clone();

        let err = session.purchase("1").await.unwrap_err();
        assert_eq!(err.user_message(), "card declined");
        assert_eq!(session.state(), &before);
        assert_eq!(session.history().len(), 3);

        let err = session.purchase("99").await.unwrap_err();
        assert_eq!(err, CoreError::ItemNotFound("99".to_string()));
        assert_eq!(bridge.request_count(), 1);
    }

    #[tokio::test]
    async fn test_deposit_and_rename() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut session = session_with(&bridge).await;

        assert_eq!(session.deposit(500).unwrap(), Coins::new(1500));
        assert!(matches!(
            session.deposit(10_001),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert_eq!(session.state().balance(), Coins::new(1500));
        assert_eq!(session.history().entries()[0].amount, 500);
        assert_eq!(session.history().len(), 4);

        session.rename("Trinity").unwrap();
        assert_eq!(session.state().display_name(), "Trinity");
    }

    #[tokio::test]
    async fn test_store_filters() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut session = session_with(&bridge).await;
        session.navigate(View::Store);

        session.set_category(Some("Games")).unwrap();
        assert!(session.set_category(Some("Movies")).is_err());
        assert_eq!(
            session.view_state().store.category.as_deref(),
            Some("Games")
        );

        let ViewModel::Store(store) = session.view() else {
            panic!("expected store view");
        };
        assert_eq!(store.shown, 1);

        session.set_category(None).unwrap();
        session.set_search("editor").unwrap();
        let ViewModel::Store(store) = session.view() else {
            panic!("expected store view");
        };
        assert_eq!(store.rows[0].item.name, "RofloEditor");
    }

    #[tokio::test]
    async fn test_signals_drive_navigation_and_about() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut session = session_with(&bridge).await;

        bridge.signals.emit(ShellSignal::NewTransaction);
        assert!(session.pump_signals().is_empty());
        assert_eq!(session.current_view(), View::History);

        bridge.signals.emit(ShellSignal::ShowAbout);
        assert_eq!(
            session.pump_signals(),
            vec!["RofloBank v1.0.0\nVirtual Currency Platform for Project Purchases".to_string()]
        );
        assert_eq!(session.current_view(), View::History);
    }

    #[tokio::test]
    async fn test_signal_during_startup_is_delivered() {
        let mut bridge = ScriptedBridge::replying(Reply::Approve);
        bridge.signal_on_start = Some(ShellSignal::NewTransaction);
        let bridge = Arc::new(bridge);

        let mut session = session_with(&bridge).await;
        assert_eq!(session.current_view(), View::Dashboard);

        assert!(session.pump_signals().is_empty());
        assert_eq!(session.current_view(), View::History);
    }

    #[tokio::test]
    async fn test_shutdown_unsubscribes() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Approve));
        let mut session = session_with(&bridge).await;
        assert_eq!(bridge.listener_count(), 1);

        session.shutdown();
        assert_eq!(bridge.listener_count(), 0);
        session.shutdown();

        let second = session_with(&bridge).await;
        assert_eq!(bridge.listener_count(), 1);
        drop(second);
        assert_eq!(bridge.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purchase_timeout_leaves_session_intact() {
        let bridge = Arc::new(ScriptedBridge::replying(Reply::Hang));
        let mut config = SessionConfig::default();
        config.bridge.timeout_ms = 250;

        let mut session = Session::start(&config, bridge.clone()).await;
        assert_eq!(session.engine.timeout(), Duration::from_millis(250));

        let err = session.purchase("3").await.unwrap_err();
        assert!(matches!(err, CoreError::BridgeUnavailable(_)));
        assert_eq!(session.state().balance(), Coins::new(1000));
        assert!(!session.state().owns("3"));
    }
}
