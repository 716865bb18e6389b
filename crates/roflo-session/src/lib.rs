//! # roflo-session: Session Layer for RofloBank
//!
//! Wraps the pure core in a running session and talks to the embedding host.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Session (session.rs)                          │  │
//! │  │   AccountState • Catalog • TransactionHistory • ViewState        │  │
//! │  └───────────────┬───────────────────────────────┬──────────────────┘  │
//! │                  │ purchase()                    │ pump_signals()      │
//! │                  ▼                               ▼                     │
//! │  ┌────────────────────────────┐   ┌─────────────────────────────────┐  │
//! │  │ PurchaseEngine (engine.rs) │   │ Subscription (bridge.rs)        │  │
//! │  │ check → host → commit      │   │ ShellSignal → ShellEvent        │  │
//! │  └──────────────┬─────────────┘   └────────────────┬────────────────┘  │
//! │                 │                                  │                   │
//! │                 ▼                                  │                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │              Arc<dyn HostBridge>  (NoOpBridge if no host)        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`bridge`] - `HostBridge` trait, shell signals, `NoOpBridge`
//! - [`config`] - Session configuration (TOML + environment)
//! - [`engine`] - `PurchaseEngine` with the bridge timeout
//! - [`error`] - Session error types
//! - [`session`] - The `Session` object

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use bridge::{BridgeError, HostBridge, NoOpBridge, ShellSignal, SignalHub, Subscription};
pub use config::SessionConfig;
pub use engine::PurchaseEngine;
pub use error::{SessionError, SessionResult};
pub use session::Session;
