//! # Transaction History
//!
//! The list behind the history screen. It starts with a few fabricated
//! entries so a new session has something to show; the session appends real
//! purchases and deposits as they complete.
//!
//! Totals only count `Completed` entries:
//! - income = sum of positive amounts
//! - spent  = sum of |negative amounts|
//! - net    = income - spent

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::coins::Coins;
use crate::purchase::PurchaseReceipt;
use crate::types::{Transaction, TransactionKind, TransactionStatus};

/// Aggregates over completed transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryTotals {
    pub income: i64,
    pub spent: i64,
    pub net: i64,
}

/// Ordered transaction log, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionHistory {
    entries: Vec<Transaction>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fabricated history a fresh session shows, relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let entry = |id: &str, kind, amount, description: &str, occurred_at| Transaction {
            id: id.to_string(),
            kind,
            amount,
            description: description.to_string(),
            occurred_at,
            status: TransactionStatus::Completed,
        };

        TransactionHistory {
            entries: vec![
                entry(
                    "1",
                    TransactionKind::Deposit,
                    1000,
                    "Initial RofloCoins deposit",
                    now,
                ),
                entry(
                    "2",
                    TransactionKind::Purchase,
                    -150,
                    "Purchased RofloOS",
                    now - Duration::days(1),
                ),
                entry(
                    "3",
                    TransactionKind::Purchase,
                    -75,
                    "Purchased RofloChat",
                    now - Duration::days(2),
                ),
            ],
        }
    }

    /// Adds an entry at the front (newest first).
    pub fn record(&mut self, transaction: Transaction) {
        self.entries.insert(0, transaction);
    }

    /// Records a committed purchase.
    pub fn record_purchase(&mut self, receipt: &PurchaseReceipt, at: DateTime<Utc>) {
        self.record(Transaction {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Purchase,
            amount: -receipt.price.as_delta(),
            description: format!("Purchased {}", receipt.item_name),
            occurred_at: at,
            status: TransactionStatus::Completed,
        });
    }

    /// Records a deposit.
    pub fn record_deposit(&mut self, amount: Coins, at: DateTime<Utc>) {
        self.record(Transaction {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Deposit,
            amount: amount.as_delta(),
            description: format!("Deposited {}", amount),
            occurred_at: at,
            status: TransactionStatus::Completed,
        });
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind, or all of them for `None`.
    pub fn filtered(&self, kind: Option<TransactionKind>) -> Vec<Transaction> {
        self.entries
            .iter()
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .cloned()
            .collect()
    }

    /// Income, spending and net over completed entries.
    pub fn totals(&self) -> HistoryTotals {
        let completed = self
            .entries
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed);

        let (income, spent) = completed.fold((0i64, 0i64), |(income, spent), t| {
            if t.amount > 0 {
                (income.saturating_add(t.amount), spent)
            } else {
                (income, spent.saturating_add(t.amount.saturating_abs()))
            }
        });

        HistoryTotals {
            income,
            spent,
            net: income.saturating_sub(spent),
        }
    }
}
