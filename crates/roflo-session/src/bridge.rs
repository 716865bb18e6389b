//! # Host Bridge
//!
//! The capability through which an embedding host talks to the session.
//!
//! ## Bridge Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Host Bridge                                    │
//! │                                                                         │
//! │  Session ──────────────────────────────────────────────► Host           │
//! │                                                                         │
//! │  initial_account()        once at start      → AccountPatch            │
//! │  submit_purchase(req)     once per purchase  → { success, message }    │
//! │  subscribe()              once at start      → Subscription            │
//! │  unsubscribe(sub)         at teardown                                  │
//! │                                                                         │
//! │  Host ─────────── ShellSignal (fire-and-forget) ──────► Session         │
//! │                                                                         │
//! │  "new-transaction"  ──► ShellEvent::Navigate(View::History)            │
//! │  "show-about"       ──► ShellEvent::ShowAbout                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without a host the session uses [`NoOpBridge`]: no initial data, every
//! purchase approved, no signals.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use roflo_core::{AccountPatch, PurchaseRequest, PurchaseResult, ShellEvent, View};

/// Buffered signals per listener before the oldest are dropped.
const SIGNAL_CAPACITY: usize = 32;

// =============================================================================
// Signals
// =============================================================================

/// Menu-level notifications pushed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellSignal {
    /// A transaction happened outside the storefront; show the history.
    NewTransaction,
    /// The host's "About" menu item.
    ShowAbout,
}

impl ShellSignal {
    /// The inbound event this signal stands for.
    pub fn to_event(self) -> ShellEvent {
        match self {
            ShellSignal::NewTransaction => ShellEvent::Navigate(View::History),
            ShellSignal::ShowAbout => ShellEvent::ShowAbout,
        }
    }
}

impl std::fmt::Display for ShellSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellSignal::NewTransaction => write!(f, "new-transaction"),
            ShellSignal::ShowAbout => write!(f, "show-about"),
        }
    }
}

impl std::str::FromStr for ShellSignal {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new-transaction" | "new_transaction" => Ok(ShellSignal::NewTransaction),
            "show-about" | "show_about" | "about" => Ok(ShellSignal::ShowAbout),
            other => Err(BridgeError::Host(format!(
                "Unknown signal: '{}'. Valid options: new-transaction, show-about",
                other
            ))),
        }
    }
}

// =============================================================================
// Bridge Errors
// =============================================================================

/// Transport-level bridge failure (distinct from a host denial).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("host bridge disconnected")]
    Disconnected,

    #[error("host error: {0}")]
    Host(String),
}

// =============================================================================
// Signal Hub
// =============================================================================

/// A registered signal listener.
///
/// Dropping it (or passing it to `unsubscribe`) removes the listener.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: broadcast::Receiver<ShellSignal>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next queued signal, without waiting.
    ///
    /// Signals dropped because the listener fell behind are skipped.
    pub fn try_next(&mut self) -> Option<ShellSignal> {
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(subscription = self.id, skipped, "Signal listener lagged");
                }
                Err(_) => return None,
            }
        }
    }

}

/// Fan-out of shell signals to every subscribed listener.
///
/// Bridge implementations embed one and delegate `subscribe` /
/// `unsubscribe` / `listener_count` to it.
#[derive(Debug)]
pub struct SignalHub {
    sender: broadcast::Sender<ShellSignal>,
    next_id: AtomicU64,
}

impl SignalHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        SignalHub {
            sender,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(subscription = id, "Signal listener added");
        Subscription {
            id,
            receiver: self.sender.subscribe(),
        }
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        debug!(subscription = subscription.id, "Signal listener removed");
        drop(subscription);
    }

    /// Sends a signal to every listener; returns how many received it.
    pub fn emit(&self, signal: ShellSignal) -> usize {
        let delivered = self.sender.send(signal).unwrap_or(0);
        debug!(%signal, delivered, "Shell signal emitted");
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Host Bridge Trait
// =============================================================================

/// The embedding host, as seen by the session.
///
/// ## Contract
/// - `submit_purchase` is called at most once per purchase attempt, after the
///   local checks have passed; only `success: true` lets the purchase commit
/// - An `Err` means the host could not be reached, not that it said no
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Partial account data to apply at session start.
    async fn initial_account(&self) -> Result<AccountPatch, BridgeError>;

    /// Asks the host to approve a purchase.
    async fn submit_purchase(&self, request: &PurchaseRequest)
        -> Result<PurchaseResult, BridgeError>;

    fn subscribe(&self) -> Subscription;

    fn unsubscribe(&self, subscription: Subscription);

    /// Number of live signal listeners.
    fn listener_count(&self) -> usize;
}

/// Bridge used when there is no host.
#[derive(Debug, Default)]
pub struct NoOpBridge {
    signals: SignalHub,
}

impl NoOpBridge {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HostBridge for NoOpBridge {
    async fn initial_account(&self) -> Result<AccountPatch, BridgeError> {
        Ok(AccountPatch::default())
    }

    async fn submit_purchase(
        &self,
        _request: &PurchaseRequest,
    ) -> Result<PurchaseResult, BridgeError> {
        Ok(PurchaseResult::approved("Approved locally"))
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

// =============================================================================
// Scripted Bridge (tests)
// =============================================================================

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::sync::Mutex;

    /// How a [`ScriptedBridge`] answers purchase requests.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Approve,
        Deny(String),
        Fail(BridgeError),
        /// Never answers.
        Hang,
    }

    /// Test bridge with canned answers that records every request.
    #[derive(Debug)]
    pub struct ScriptedBridge {
        pub initial: Result<AccountPatch, BridgeError>,
        /// Emitted from inside `initial_account`, before it answers.
        pub signal_on_start: Option<ShellSignal>,
        pub reply: Reply,
        pub requests: Mutex<Vec<PurchaseRequest>>,
        pub signals: SignalHub,
    }

    impl ScriptedBridge {
        pub fn replying(reply: Reply) -> Self {
            ScriptedBridge {
                initial: Ok(AccountPatch::default()),
                signal_on_start: None,
                reply,
                requests: Mutex::new(Vec::new()),
                signals: SignalHub::new(),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HostBridge for ScriptedBridge {
        async fn initial_account(&self) -> Result<AccountPatch, BridgeError> {
            if let Some(signal) = self.signal_on_start {
                self.signals.emit(signal);
            }
            self.initial.clone()
        }

        async fn submit_purchase(
            &self,
            request: &PurchaseRequest,
        ) -> Result<PurchaseResult, BridgeError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Reply::Approve => Ok(PurchaseResult::approved("Purchase successful")),
                Reply::Deny(message) => Ok(PurchaseResult::denied(message.clone())),
                Reply::Fail(err) => Err(err.clone()),
                Reply::Hang => std::future::pending().await,
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_maps_to_event() {
        assert_eq!(
            ShellSignal::NewTransaction.to_event(),
            ShellEvent::Navigate(View::History)
        );
        assert_eq!(ShellSignal::ShowAbout.to_event(), ShellEvent::ShowAbout);
    }

    #[test]
    fn test_signal_parsing() {
        assert_eq!(
            "new-transaction".parse::<ShellSignal>().unwrap(),
            ShellSignal::NewTransaction
        );
        assert_eq!("about".parse::<ShellSignal>().unwrap(), ShellSignal::ShowAbout);
        assert!("reboot".parse::<ShellSignal>().is_err());
        assert_eq!(ShellSignal::ShowAbout.to_string(), "show-about");
    }

    #[test]
    fn test_hub_delivers_to_every_listener() {
        let hub = SignalHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_ne!(a.id(), b.id());

        assert_eq!(hub.emit(ShellSignal::ShowAbout), 2);
        assert_eq!(a.try_next(), Some(ShellSignal::ShowAbout));
        assert_eq!(b.try_next(), Some(ShellSignal::ShowAbout));
        assert_eq!(a.try_next(), None);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let hub = SignalHub::new();
        let sub = hub.subscribe();
        assert_eq!(hub.listener_count(), 1);

        hub.unsubscribe(sub);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.emit(ShellSignal::NewTransaction), 0);
    }

    #[tokio::test]
    async fn test_noop_bridge() {
        let bridge = NoOpBridge::new();
        assert!(bridge.initial_account().await.unwrap().is_empty());

        let request = PurchaseRequest {
            id: "1".to_string(),
            name: "RofloOS".to_string(),
            price: roflo_core::Coins::new(150),
        };
        assert!(bridge.submit_purchase(&request).await.unwrap().success);
    }
}
