//! # Local Host
//!
//! The shell's own host bridge. It plays the part an embedding window
//! process would: hands out the user profile at start, approves purchases,
//! and raises menu signals when asked.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use roflo_core::{AccountPatch, PurchaseRequest, PurchaseResult};
use roflo_session::{BridgeError, HostBridge, ShellSignal, SignalHub, Subscription};

pub struct LocalHost {
    profile: AccountPatch,
    signals: SignalHub,
    approved: AtomicUsize,
}

impl LocalHost {
    /// A host that supplies `profile` as the initial account data.
    pub fn new(profile: AccountPatch) -> Self {
        LocalHost {
            profile,
            signals: SignalHub::new(),
            approved: AtomicUsize::new(0),
        }
    }

    /// Raises a menu signal; returns how many listeners received it.
    pub fn menu(&self, signal: ShellSignal) -> usize {
        info!(%signal, "Menu signal");
        self.signals.emit(signal)
    }

    /// Purchases approved so far.
    pub fn approved_count(&self) -> usize {
        self.approved.load(Ordering::Relaxed)
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new(AccountPatch::default())
    }
}

#[async_trait]
impl HostBridge for LocalHost {
    async fn initial_account(&self) -> Result<AccountPatch, BridgeError> {
        Ok(self.profile.clone())
    }

    async fn submit_purchase(
        &self,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, BridgeError> {
        info!(
            project_id = %request.id,
            project = %request.name,
            price = %request.price,
            "Purchase approved by host"
        );
        self.approved.fetch_add(1, Ordering::Relaxed);
        Ok(PurchaseResult::approved("Purchase successful"))
    }

    fn subscribe(&self) -> Subscription {
        self.signals.subscribe()
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.signals.unsubscribe(subscription)
    }

    fn listener_count(&self) -> usize {
        self.signals.listener_count()
    }
}
